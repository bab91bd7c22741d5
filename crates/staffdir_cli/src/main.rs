//! `staffdir` command-line front end for the employee store.
//!
//! # Usage
//!
//! ```text
//! staffdir --db staff.sqlite3 add Jack Bauer
//! staffdir --db staff.sqlite3 search Bau --json
//! STAFFDIR_LOG_DIR=/var/log/staffdir staffdir list
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use staffdir_core::{
    default_log_level, init_logging, open_db, Employee, EmployeeId, EmployeeService,
    EmployeeStore, SqliteEmployeeStore,
};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "staffdir", version, about = "Manage employee records")]
struct Args {
    /// SQLite database file; created and migrated on first use.
    #[arg(long, env = "STAFFDIR_DB", default_value = "staffdir.sqlite3")]
    db: PathBuf,

    /// trace|debug|info|warn|error. Defaults by build mode.
    #[arg(long, env = "STAFFDIR_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files. No file logging when unset.
    #[arg(long, env = "STAFFDIR_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Print records as JSON lines.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Create an employee.
    Add { first_name: String, last_name: String },
    /// Show one employee.
    Get { id: EmployeeId },
    /// List all employees.
    List,
    /// Replace both names of an employee.
    Update {
        id: EmployeeId,
        first_name: String,
        last_name: String,
    },
    /// Delete an employee; unknown ids are ignored.
    Delete { id: EmployeeId },
    /// Case-sensitive last-name substring search.
    Search { text: String },
    /// Print the number of employees.
    Count,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(log_dir) = &args.log_dir {
        let level = args.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).context("initializing logging")?;
    }

    let conn = open_db(&args.db)
        .with_context(|| format!("opening database {}", args.db.display()))?;
    let service = EmployeeService::new(SqliteEmployeeStore::new(&conn));

    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut output = Output {
        out: stdout.lock(),
        err: stderr.lock(),
        json: args.json,
    };
    run(&service, args.command, &mut output)
}

/// Destinations for records and for not-found notices.
struct Output<O: Write, E: Write> {
    out: O,
    err: E,
    json: bool,
}

impl<O: Write, E: Write> Output<O, E> {
    fn employee(&mut self, employee: &Employee) -> Result<()> {
        if self.json {
            serde_json::to_writer(&mut self.out, employee)?;
            writeln!(self.out)?;
        } else {
            writeln!(self.out, "{employee}")?;
        }
        Ok(())
    }

    fn not_found(&mut self, id: EmployeeId) -> Result<()> {
        writeln!(self.err, "no employee with id {id}")?;
        Ok(())
    }
}

fn run<S: EmployeeStore, O: Write, E: Write>(
    service: &EmployeeService<S>,
    command: Command,
    output: &mut Output<O, E>,
) -> Result<()> {
    match command {
        Command::Add {
            first_name,
            last_name,
        } => {
            let employee = service
                .hire(first_name, last_name)
                .context("saving employee")?;
            info!(
                "event=cli_add module=cli status=ok id={}",
                employee.id.unwrap_or_default()
            );
            output.employee(&employee)?;
        }
        Command::Get { id } => match service.get(id).context("loading employee")? {
            Some(employee) => output.employee(&employee)?,
            None => output.not_found(id)?,
        },
        Command::List => {
            for employee in service.list().context("listing employees")? {
                output.employee(&employee)?;
            }
        }
        Command::Update {
            id,
            first_name,
            last_name,
        } => match service
            .rename(id, first_name, last_name)
            .context("updating employee")?
        {
            Some(employee) => output.employee(&employee)?,
            None => output.not_found(id)?,
        },
        Command::Delete { id } => {
            service.dismiss(id).context("deleting employee")?;
        }
        Command::Search { text } => {
            for employee in service
                .search_last_name(&text)
                .context("searching employees")?
            {
                output.employee(&employee)?;
            }
        }
        Command::Count => {
            let headcount = service.headcount().context("counting employees")?;
            writeln!(output.out, "{headcount}")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{run, Args, Command, Output};
    use clap::{CommandFactory, Parser};
    use staffdir_core::{open_db_in_memory, EmployeeService, SqliteEmployeeStore};

    type Service<'conn> = EmployeeService<SqliteEmployeeStore<'conn>>;

    /// Runs one command and returns `(stdout, stderr)`.
    fn exec(service: &Service<'_>, command: Command, json: bool) -> (String, String) {
        let mut output = Output {
            out: Vec::new(),
            err: Vec::new(),
            json,
        };
        run(service, command, &mut output).unwrap();
        (
            String::from_utf8(output.out).unwrap(),
            String::from_utf8(output.err).unwrap(),
        )
    }

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("staffdir").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn command_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_every_subcommand() {
        assert_eq!(
            parse(&["add", "Jack", "Bauer"]).command,
            Command::Add {
                first_name: "Jack".to_string(),
                last_name: "Bauer".to_string(),
            }
        );
        assert_eq!(parse(&["get", "3"]).command, Command::Get { id: 3 });
        assert_eq!(parse(&["list"]).command, Command::List);
        assert_eq!(
            parse(&["update", "3", "Kim", "Bauer"]).command,
            Command::Update {
                id: 3,
                first_name: "Kim".to_string(),
                last_name: "Bauer".to_string(),
            }
        );
        assert_eq!(parse(&["delete", "3"]).command, Command::Delete { id: 3 });
        assert_eq!(
            parse(&["search", "mith"]).command,
            Command::Search {
                text: "mith".to_string(),
            }
        );
        assert_eq!(parse(&["count"]).command, Command::Count);
    }

    #[test]
    fn parses_global_flags() {
        let args = parse(&["--db", "/tmp/staff.db", "list", "--json"]);
        assert_eq!(args.db.to_str(), Some("/tmp/staff.db"));
        assert!(args.json);
    }

    #[test]
    fn rejects_non_numeric_id_and_missing_arguments() {
        assert!(Args::try_parse_from(["staffdir", "get", "abc"]).is_err());
        assert!(Args::try_parse_from(["staffdir", "add", "Jack"]).is_err());
        assert!(Args::try_parse_from(["staffdir"]).is_err());
    }

    #[test]
    fn add_search_update_delete_count_flow() {
        let conn = open_db_in_memory().unwrap();
        let service = EmployeeService::new(SqliteEmployeeStore::new(&conn));

        let (out, _) = exec(&service, parse(&["add", "Ann", "Smith"]).command, false);
        assert_eq!(out, "Employee[id=1, firstName='Ann', lastName='Smith']\n");
        exec(&service, parse(&["add", "Bob", "Smithson"]).command, false);
        exec(&service, parse(&["add", "Cid", "Jones"]).command, false);

        let (out, _) = exec(&service, parse(&["search", "mith"]).command, false);
        assert_eq!(out.lines().count(), 2);
        assert!(!out.contains("Jones"));

        let (out, _) = exec(&service, parse(&["update", "3", "Cid", "Smithers"]).command, false);
        assert_eq!(out, "Employee[id=3, firstName='Cid', lastName='Smithers']\n");

        exec(&service, parse(&["delete", "1"]).command, false);
        exec(&service, parse(&["delete", "1"]).command, false);

        let (out, _) = exec(&service, parse(&["count"]).command, false);
        assert_eq!(out, "2\n");
    }

    #[test]
    fn json_output_is_one_object_per_line() {
        let conn = open_db_in_memory().unwrap();
        let service = EmployeeService::new(SqliteEmployeeStore::new(&conn));
        exec(&service, parse(&["add", "Jack", "Bauer"]).command, false);
        exec(&service, parse(&["add", "Kim", "Bauer"]).command, false);

        let (out, _) = exec(&service, parse(&["list"]).command, true);
        let rows: Vec<serde_json::Value> = out
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id"], 1);
        assert_eq!(rows[0]["firstName"], "Jack");
        assert_eq!(rows[1]["lastName"], "Bauer");
    }

    #[test]
    fn unknown_id_reports_on_stderr_only() {
        let conn = open_db_in_memory().unwrap();
        let service = EmployeeService::new(SqliteEmployeeStore::new(&conn));

        let (out, err) = exec(&service, parse(&["get", "42"]).command, false);
        assert!(out.is_empty());
        assert_eq!(err, "no employee with id 42\n");

        let (out, err) = exec(&service, parse(&["update", "42", "A", "B"]).command, true);
        assert!(out.is_empty());
        assert_eq!(err, "no employee with id 42\n");
    }
}
