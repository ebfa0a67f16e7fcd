//! Shell integration scripts printed by `g --init <shell>`.
//!
//! Each script defines `ls`, `ll`, `la` and `lt` in terms of `g`.

use crate::error::ListError;

use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Nushell,
}

impl FromStr for Shell {
    type Err = ListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bash" => Ok(Shell::Bash),
            "zsh" => Ok(Shell::Zsh),
            "fish" => Ok(Shell::Fish),
            "powershell" | "pwsh" => Ok(Shell::PowerShell),
            "nushell" | "nu" => Ok(Shell::Nushell),
            _ => Err(ListError::UnsupportedShell(s.to_string())),
        }
    }
}

impl Shell {
    /// The integration script of this shell.
    pub fn script(self) -> &'static str {
        match self {
            Shell::Bash | Shell::Zsh => POSIX,
            Shell::Fish => FISH,
            Shell::PowerShell => POWERSHELL,
            Shell::Nushell => NUSHELL,
        }
    }
}

const POSIX: &str = r#"# g shell integration
alias ls='g'
alias ll='g --long --git'
alias la='g --all'
alias lt='g --tree --depth 3'
"#;

const FISH: &str = r#"# g shell integration
function ls --wraps g
    g $argv
end
function ll --wraps g
    g --long --git $argv
end
function la --wraps g
    g --all $argv
end
function lt --wraps g
    g --tree --depth 3 $argv
end
"#;

const POWERSHELL: &str = r#"# g shell integration
Remove-Item Alias:ls -Force -ErrorAction SilentlyContinue
function ls { g @args }
function ll { g --long --git @args }
function la { g --all @args }
function lt { g --tree --depth 3 @args }
"#;

const NUSHELL: &str = r#"# g shell integration
alias ls = ^g
alias ll = ^g --long --git
alias la = ^g --all
alias lt = ^g --tree --depth 3
"#;
