//! Command-line argument parsing for the green-plate CLI.

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Print the persisted session
    WhoAmI,
    /// Sign out and delete the persisted session
    SignOut,
    /// List listings, filtered by `name=value` pairs
    Listings(Vec<(String, String)>),
    /// Show one reservation with its pickup code
    Reservation(String),
    /// Arguments that could not be parsed, with the reason
    Invalid(String),
}

/// Parse command-line arguments and return the appropriate command.
///
/// # Examples
///
/// ```
/// use green_plate::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["green-plate".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    // Skip the program name
    let mut args = args.skip(1);
    let Some(command) = args.next() else {
        return CliCommand::Help;
    };

    match command.as_str() {
        "--version" | "-V" => CliCommand::Version,
        "help" | "--help" | "-h" => CliCommand::Help,
        "whoami" => CliCommand::WhoAmI,
        "sign-out" | "signout" => CliCommand::SignOut,
        "listings" => parse_filters(args),
        "reservation" => match args.next() {
            Some(id) if !id.trim().is_empty() => CliCommand::Reservation(id),
            _ => CliCommand::Invalid("reservation requires an id".to_string()),
        },
        other => CliCommand::Invalid(format!("unknown command '{}'", other)),
    }
}

fn parse_filters<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut filters = Vec::new();
    for arg in args {
        match arg.split_once('=') {
            Some((name, value)) if !name.is_empty() => {
                filters.push((name.to_string(), value.to_string()))
            }
            _ => return CliCommand::Invalid(format!("expected name=value, got '{}'", arg)),
        }
    }
    CliCommand::Listings(filters)
}
