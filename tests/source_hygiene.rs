use std::fs;
use std::path::{Path, PathBuf};

/// a source line flagged by one of the checks
struct Finding {
    file: PathBuf,
    line_num: usize,
    line: String,
}

#[test]
fn no_todo_comments() {
    let findings = scan(is_todo_in_comment);
    report("TODO comment", &findings);
}

#[test]
fn no_dbg_macros() {
    let findings = scan(|line| {
        let code = line.split("//").next().unwrap_or("");
        code.contains("dbg!(")
    });
    report("dbg! call", &findings);
}

fn report(what: &str, findings: &[Finding]) {
    if findings.is_empty() {
        return;
    }
    eprintln!("\nfound {} {}(s):", findings.len(), what);
    for finding in findings {
        eprintln!(
            "  {}:{}: {}",
            finding.file.display(),
            finding.line_num,
            finding.line.trim()
        );
    }
    panic!("{what}s must be removed before tests pass");
}

/// run `check` over every line of every rust file under src/
fn scan(check: impl Fn(&str) -> bool) -> Vec<Finding> {
    let mut files = Vec::new();
    collect_rust_files(Path::new("src"), &mut files);

    let mut findings = Vec::new();
    for file in files {
        let Ok(content) = fs::read_to_string(&file) else {
            continue;
        };
        for (index, line) in content.lines().enumerate() {
            if check(line) {
                findings.push(Finding {
                    file: file.clone(),
                    line_num: index + 1,
                    line: line.to_string(),
                });
            }
        }
    }
    findings
}

fn collect_rust_files(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rust_files(&path, files);
        } else if path.extension().and_then(|s| s.to_str()) == Some("rs") {
            files.push(path);
        }
    }
}

fn is_todo_in_comment(line: &str) -> bool {
    let line_upper = line.to_ascii_uppercase();

    // line comments and block comment openers
    for marker in ["//", "/*"] {
        if let Some(pos) = line.find(marker)
            && line_upper[pos..].contains("TODO")
        {
            return true;
        }
    }

    // block comment continuation lines (e.g., " * TODO")
    let trimmed = line.trim_start();
    trimmed.starts_with('*') && !trimmed.starts_with("*/") && line_upper.contains("TODO")
}
