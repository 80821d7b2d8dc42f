//! `gitagu repo-name`.

use anyhow::{Result, bail};

use gitagu::repo::extract_repo_name;

pub fn cmd_repo_name(input: &str) -> Result<()> {
    let name = extract_repo_name(input);
    if name.is_empty() {
        bail!("'{}' does not name a GitHub repository", input.trim());
    }
    println!("{}", name);
    Ok(())
}
