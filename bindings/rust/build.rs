use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// ABI understood by the `tree-sitter` runtime this crate links against.
const GENERATE_ABI: &str = "14";

fn main() {
    println!("cargo:rerun-if-changed=grammar.js");
    println!("cargo:rerun-if-changed=src/parser.c");
    println!("cargo:rerun-if-changed=src/scanner.c");
    println!("cargo:rerun-if-env-changed=TREE_SITTER_CLI");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR"));
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR"));

    let src_dir = match checked_in_parser(&manifest_dir) {
        Some(dir) => dir,
        None => match generate_parser(&manifest_dir, &out_dir) {
            Ok(dir) => dir,
            Err(reason) => panic!(
                "no Isograph parser: src/parser.c is missing and generating it failed: {reason}\n\
                 install the tree-sitter CLI (0.22) or point TREE_SITTER_CLI at it"
            ),
        },
    };

    let mut c_config = cc::Build::new();
    c_config
        .std("c11")
        .include(&src_dir)
        .flag_if_supported("-Wno-unused-parameter")
        .flag_if_supported("-Wno-unused-but-set-variable")
        .flag_if_supported("-Wno-trigraphs");
    #[cfg(target_env = "msvc")]
    c_config.flag("-utf-8");

    c_config.file(src_dir.join("parser.c"));
    let scanner = src_dir.join("scanner.c");
    if scanner.exists() {
        c_config.file(scanner);
    }
    c_config.compile("tree-sitter-isograph");

    println!("cargo:rustc-env=ISOGRAPH_GRAMMAR_SRC={}", src_dir.display());
}

/// Returns `src/` when a generated parser has been committed next to the grammar.
fn checked_in_parser(manifest_dir: &Path) -> Option<PathBuf> {
    let src_dir = manifest_dir.join("src");
    src_dir.join("parser.c").is_file().then_some(src_dir)
}

/// Runs `tree-sitter generate` on a copy of `grammar.js` inside `OUT_DIR`.
fn generate_parser(manifest_dir: &Path, out_dir: &Path) -> Result<PathBuf, String> {
    let cli = env::var("TREE_SITTER_CLI").unwrap_or_else(|_| "tree-sitter".to_string());

    let work_dir = out_dir.join("grammar");
    fs::create_dir_all(&work_dir)
        .map_err(|e| format!("creating {}: {e}", work_dir.display()))?;
    fs::copy(manifest_dir.join("grammar.js"), work_dir.join("grammar.js"))
        .map_err(|e| format!("copying grammar.js: {e}"))?;

    let status = Command::new(&cli)
        .args(["generate", "--abi", GENERATE_ABI])
        .current_dir(&work_dir)
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| format!("running `{cli}`: {e}"))?;
    if !status.success() {
        return Err(format!("`{cli} generate` exited with {status}"));
    }

    let src_dir = work_dir.join("src");
    if !src_dir.join("parser.c").is_file() {
        return Err(format!("`{cli} generate` did not produce src/parser.c"));
    }
    Ok(src_dir)
}
