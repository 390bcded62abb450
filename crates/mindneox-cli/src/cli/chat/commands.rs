//! Slash command parsing for the chat loop.
//!
//! Commands start with `/` and control the local session and usage display.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Sign in as a visitor id, with an optional display name.
    Login {
        visitor_id: String,
        name: Option<String>,
    },
    /// Sign out of the local session.
    Logout,
    /// Show the guest usage snapshot.
    Usage,
    /// Leave the chat.
    Quit,
    /// Unknown or malformed command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd.to_lowercase(), arg.trim()),
        None => (trimmed.to_lowercase(), ""),
    };

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/login" | "/signin" => {
            let (visitor_id, name) = match arg.split_once(char::is_whitespace) {
                Some((id, name)) => (id, Some(name.trim().to_string())),
                None => (arg, None),
            };
            if visitor_id.is_empty() {
                Some(ChatCommand::Unknown("/login requires a visitor id".to_string()))
            } else {
                Some(ChatCommand::Login {
                    visitor_id: visitor_id.to_string(),
                    name: name.filter(|n| !n.is_empty()),
                })
            }
        }
        "/logout" | "/signout" => Some(ChatCommand::Logout),
        "/usage" => Some(ChatCommand::Usage),
        "/quit" | "/exit" | "/q" => Some(ChatCommand::Quit),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Whether a yes/no answer means yes. Anything unrecognized is no.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Print the list of available slash commands.
pub fn print_help() {
    println!();
    println!("  {}", style("Commands").bold());
    println!("  {}  Sign in and restore your history", style("/login <id> [name]").cyan());
    println!("  {}             Sign out, guest limits apply again", style("/logout").cyan());
    println!("  {}              Show guest conversation usage", style("/usage").cyan());
    println!("  {}               Leave the chat (also Ctrl+D)", style("/quit").cyan());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert_eq!(parse("hello there"), None);
        assert_eq!(parse("  what is /login?"), None);
    }

    #[test]
    fn test_parse_quit() {
        assert_eq!(parse("/quit"), Some(ChatCommand::Quit));
        assert_eq!(parse("/exit"), Some(ChatCommand::Quit));
        assert_eq!(parse("/Q"), Some(ChatCommand::Quit));
    }

    #[test]
    fn test_parse_login() {
        assert_eq!(
            parse("/login user_2abc"),
            Some(ChatCommand::Login {
                visitor_id: "user_2abc".to_string(),
                name: None,
            })
        );
        assert_eq!(
            parse("/login user_2abc  Ada Lovelace "),
            Some(ChatCommand::Login {
                visitor_id: "user_2abc".to_string(),
                name: Some("Ada Lovelace".to_string()),
            })
        );
    }

    #[test]
    fn test_parse_login_without_id() {
        assert!(matches!(parse("/login"), Some(ChatCommand::Unknown(_))));
        assert!(matches!(parse("/login   "), Some(ChatCommand::Unknown(_))));
    }

    #[test]
    fn test_parse_session_and_usage() {
        assert_eq!(parse("/logout"), Some(ChatCommand::Logout));
        assert_eq!(parse("/usage"), Some(ChatCommand::Usage));
        assert_eq!(parse("/help"), Some(ChatCommand::Help));
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("maybe"));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            parse("/foo bar"),
            Some(ChatCommand::Unknown("/foo".to_string()))
        );
    }
}
