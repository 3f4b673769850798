use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    modepack completions bash > ~/.bash_completion.d/modepack\n\n\
                  Generate zsh completions:\n    modepack completions zsh > ~/.zfunc/_modepack\n\n\
                  Generate fish completions:\n    modepack completions fish > ~/.config/fish/completions/modepack.fish\n\n\
                  Generate PowerShell completions:\n    modepack completions powershell")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
