//! These are all the functional processes run by `reeldice` CLI commands.
use std::io::{self, BufRead, Write};

use camino::Utf8Path;
use color_eyre::eyre::{self, eyre};
use tracing::info;

use crate::{
    backend::{CredentialStore, DecisionProvider, RoundDraw, RoundEngine, ScoreStore, Session},
    config::Config,
    error::Error,
};

// ACCOUNTS

/// Create a new account.
pub fn new_account(config: &Config, data_dir: &Utf8Path, username: String) -> eyre::Result<()> {
    let password = rpassword::prompt_password(format!("Password for new account {}: ", username))?;
    let confirm_password =
        rpassword::prompt_password(format!("Confirm password for new account {}: ", username))?;
    if confirm_password != password {
        return Err(eyre!("Passwords for new account do not match."));
    }

    let mut store = CredentialStore::open(config.credentials_path(data_dir))?;
    match store.register(&username, &password) {
        Ok(()) => println!("Registration successful!"),
        Err(Error::DuplicateUserError(_)) => {
            println!("Registration failed. User \"{username}\" already exists.")
        }
        Err(err @ Error::InvalidUsernameError(..)) => println!("Registration failed. {err}"),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

// GAME

/// Log in, then fish until the player stops. The session total is merged into the high scores.
pub fn play(
    config: &Config,
    data_dir: &Utf8Path,
    username: String,
    seed: Option<u64>,
) -> eyre::Result<()> {
    let store = CredentialStore::open(config.credentials_path(data_dir))?;
    let password = rpassword::prompt_password(format!("Password for {}: ", username))?;
    if !store.verify(&username, &password) {
        info!(username = username.as_str(), "login refused");
        println!("Authentication failed.");
        return Ok(());
    }
    println!("Authentication successful!");

    let tables = config.lookup_tables(data_dir)?;
    let mut engine = match seed {
        Some(seed) => RoundEngine::with_seed(tables, seed),
        None => RoundEngine::new(tables),
    };
    let mut session = Session::new(&username);
    let mut prompt = Prompt::new(io::stdin().lock(), io::stdout());
    fish(&mut engine, &mut session, &mut prompt)?;

    println!("\nGame Over");
    println!("Total Score: {}", session.total());
    println!("Catches: {}", session.catches().join(", "));

    let scores = ScoreStore::new(config.scores_path(data_dir));
    let outcome = session.finish(&scores)?;
    println!("{}", outcome.message());
    Ok(())
}

/// Play rounds until the player declines to continue.
pub fn fish<R, W>(
    engine: &mut RoundEngine,
    session: &mut Session,
    prompt: &mut Prompt<R, W>,
) -> eyre::Result<()>
where
    R: BufRead,
    W: Write,
{
    loop {
        let result = engine.play_round_with(prompt)?;
        session.record(&result);
        if result.auto_keep {
            prompt.say(&format!(
                "You caught {}. That one's yours either way ({} points).",
                result.catch, result.points
            ))?;
        }
        prompt.say(&format!("Current Score: {}", session.total()))?;
        if !prompt.confirm("Do you want to continue fishing? [y/N]: ")? {
            return Ok(());
        }
    }
}

// SCORES

/// Print the high-score table.
pub fn show_scores(config: &Config, data_dir: &Utf8Path) -> eyre::Result<()> {
    let scores = ScoreStore::new(config.scores_path(data_dir));
    print!("{}", format_leaderboard(&scores.leaderboard()?));
    Ok(())
}

/// Format a sorted leaderboard, one ranked player per line.
pub fn format_leaderboard(board: &[(String, i64)]) -> String {
    if board.is_empty() {
        return String::from("No scores yet.\n");
    }
    board
        .iter()
        .enumerate()
        .fold(String::new(), |acc, (rank, (username, score))| {
            acc + &format!("{:>3}. {:<24} {:>6}\n", rank + 1, username, score)
        })
}

/// Terminal questions and answers over any reader/writer pair.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}
impl<R, W> Prompt<R, W>
where
    R: BufRead,
    W: Write,
{
    /// Create a [Prompt] reading answers from `input` and writing questions to `output`.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print one line.
    pub fn say(&mut self, message: &str) -> eyre::Result<()> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }

    /// Ask a yes/no question. Anything not starting with `y`, including end of input, is no.
    pub fn confirm(&mut self, message: &str) -> eyre::Result<bool> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;
        let mut input = String::new();
        self.input.read_line(&mut input)?;
        match input.trim_start().to_lowercase().chars().next() {
            Some('y') => Ok(true),
            _ => Ok(false),
        }
    }

    /// Get the writer this [Prompt] prints to.
    pub fn output(&self) -> &W {
        &self.output
    }
}
impl<R, W> DecisionProvider for Prompt<R, W>
where
    R: BufRead,
    W: Write,
{
    fn keep(&mut self, draw: &RoundDraw) -> eyre::Result<bool> {
        self.confirm(&format!(
            "You caught a {}! Keep it for {} points or release it for {}? Keep? [y/N]: ",
            draw.catch, draw.points_if_kept, draw.points_if_released
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::backend::LookupTables;

    fn prompt(answers: &str) -> Prompt<Cursor<Vec<u8>>, Vec<u8>> {
        Prompt::new(Cursor::new(answers.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn confirm_answers() {
        let mut p = prompt("y\nYes\n  y\nn\n\nwhatever\n");
        assert!(p.confirm("?").unwrap());
        assert!(p.confirm("?").unwrap());
        assert!(p.confirm("?").unwrap());
        assert!(!p.confirm("?").unwrap());
        assert!(!p.confirm("?").unwrap());
        assert!(!p.confirm("?").unwrap());
        // End of input.
        assert!(!p.confirm("?").unwrap());
        assert_eq!(p.output().as_slice(), b"???????");
    }

    #[test]
    fn fish_until_declined() {
        let mut engine = RoundEngine::with_seed(LookupTables::default(), 5);
        let mut session = Session::new("angler");
        // Always keep, stop after the third "continue?" regardless of how many prompts the
        // auto-keep catches skip.
        let mut p = prompt(&"y\n".repeat(40));
        let mut rounds_left = 3;
        loop {
            let result = engine.play_round_with(&mut p).unwrap();
            session.record(&result);
            assert!(result.kept);
            rounds_left -= 1;
            if rounds_left == 0 {
                break;
            }
        }
        assert_eq!(session.rounds(), 3);

        let mut short_session = Session::new("angler");
        let mut declining = prompt("");
        fish(&mut engine, &mut short_session, &mut declining).unwrap();
        assert_eq!(short_session.rounds(), 1);
        let transcript = String::from_utf8(declining.output().clone()).unwrap();
        assert!(transcript.contains("Current Score:"));
        assert!(transcript.ends_with("Do you want to continue fishing? [y/N]: "));
    }

    #[test]
    fn leaderboard_text() {
        assert_eq!(format_leaderboard(&[]), "No scores yet.\n");
        let board = vec![(String::from("angler"), 42), (String::from("bream"), -3)];
        let text = format_leaderboard(&board);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  1. angler"));
        assert!(lines[0].ends_with("    42"));
        assert!(lines[1].starts_with("  2. bream"));
    }
}
