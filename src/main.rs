use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use contactbook::index::stats::show_stats;
use contactbook::logging::init_logging;
use contactbook::output;
use contactbook::query::parse_name_query;
use contactbook::utils::app_data::{AppConfig, get_config_path};
use contactbook::{AddressFields, ContactBook, NewPerson, PersonId, RecordId};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "contactbook")]
#[command(about = "Contact book with instant prefix search on names")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database file (overrides the configured one)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Args)]
struct NameArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(short, long)]
    first: Option<String>,
    #[arg(short, long)]
    middle: Option<String>,
    #[arg(short, long)]
    last: Option<String>,
    #[arg(long)]
    suffix: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a person
    Add {
        #[command(flatten)]
        name: NameArgs,
        /// First phone number
        #[arg(long)]
        phone: Option<String>,
        #[arg(long, requires = "phone")]
        phone_label: Option<String>,
        /// First email address
        #[arg(long)]
        email: Option<String>,
        #[arg(long, requires = "email")]
        email_label: Option<String>,
        /// Group to add the person to
        #[arg(long)]
        group: Option<RecordId>,
    },
    /// Find people by name prefixes; every word must match
    Find {
        #[arg(trailing_var_arg = true)]
        words: Vec<String>,
    },
    /// Show a person with all contact details
    Show { id: PersonId },
    /// List people, optionally only members of a group
    List {
        #[arg(short, long)]
        group: Option<RecordId>,
    },
    /// Find people by email address prefix
    Email { prefix: String },
    /// Change name attributes of a person; an empty value clears one
    Update {
        id: PersonId,
        #[command(flatten)]
        name: NameArgs,
    },
    /// Delete a person with all contact details
    Delete { id: PersonId },
    /// Manage groups
    Group {
        #[command(subcommand)]
        action: GroupAction,
    },
    /// Manage phone numbers
    Phone {
        #[command(subcommand)]
        action: DetailAction,
    },
    /// Manage email addresses
    Mail {
        #[command(subcommand)]
        action: DetailAction,
    },
    /// Manage postal addresses
    Address {
        #[command(subcommand)]
        action: AddressAction,
    },
    /// Show database and name index statistics
    Stats,
    /// Show or change the configuration
    Config {
        /// Database file to use by default
        #[arg(long)]
        database: Option<PathBuf>,
        /// Log filter used when RUST_LOG is not set
        #[arg(long)]
        log_filter: Option<String>,
    },
}

#[derive(Subcommand)]
enum GroupAction {
    /// List all groups
    List,
    Create { name: String },
    Delete { id: RecordId },
    Rename { id: RecordId, name: String },
    /// Add a person to a group
    Assign { person: PersonId, group: RecordId },
    /// Remove a person from a group
    Unassign { person: PersonId, group: RecordId },
}

#[derive(Subcommand)]
enum DetailAction {
    Add {
        person: PersonId,
        value: String,
        #[arg(long)]
        label: Option<String>,
    },
    Delete { id: RecordId },
}

#[derive(Subcommand)]
enum AddressAction {
    Add {
        person: PersonId,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        house_number: Option<String>,
        #[arg(long)]
        street: Option<String>,
        #[arg(long)]
        line1: Option<String>,
        #[arg(long)]
        line2: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        postal_code: Option<String>,
        #[arg(long)]
        country: Option<String>,
    },
    Delete { id: RecordId },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load().context("Failed to load configuration")?;
    init_logging(&config.log_filter);

    let color = !cli.no_color;

    if let Commands::Config { database, log_filter } = &cli.command {
        return configure(config, database.clone(), log_filter.clone());
    }

    if let Some(db) = cli.db {
        config.database_path = Some(db);
    }
    let db_path = config.effective_database_path()?;
    let mut book = ContactBook::open(&db_path)
        .with_context(|| format!("Failed to open contact database {}", db_path.display()))?;

    match cli.command {
        Commands::Add { name, phone, phone_label, email, email_label, group } => {
            let person = book.create_person(NewPerson {
                title: name.title,
                first_name: name.first,
                middle_name: name.middle,
                last_name: name.last,
                suffix: name.suffix,
                phone_number: phone,
                phone_label,
                email_address: email,
                email_label,
                group_id: group,
            })?;
            println!("Added {} (#{})", person.full_name(), person.id);
        }
        Commands::Find { words } => {
            let text = words.join(" ");
            let entries = book.find_person_details_by_name(&text);
            output::print_lookup_entries(&entries, &parse_name_query(&text), color)?;
        }
        Commands::Show { id } => {
            output::print_person(&book.get_person_by_id(id)?, color)?;
        }
        Commands::List { group } => {
            output::print_persons(&book.get_all_persons(group)?, color)?;
        }
        Commands::Email { prefix } => {
            output::print_persons(&book.get_persons_by_email(&prefix)?, color)?;
        }
        Commands::Update { id, name } => {
            let mut person = book.get_person_by_id(id)?;
            apply_name(&mut person.title, name.title);
            apply_name(&mut person.first_name, name.first);
            apply_name(&mut person.middle_name, name.middle);
            apply_name(&mut person.last_name, name.last);
            apply_name(&mut person.suffix, name.suffix);
            let person = book.update_person(&person)?;
            println!("Updated {} (#{})", person.full_name(), person.id);
        }
        Commands::Delete { id } => {
            book.delete_person(id)?;
            println!("Deleted person #{}", id);
        }
        Commands::Group { action } => handle_group_command(&mut book, action, color)?,
        Commands::Phone { action } => match action {
            DetailAction::Add { person, value, label } => {
                let phone = book.add_phone_number(person, &value, label.as_deref())?;
                println!("Added {}", phone);
            }
            DetailAction::Delete { id } => {
                book.delete_phone_number(id)?;
                println!("Deleted phone number #{}", id);
            }
        },
        Commands::Mail { action } => match action {
            DetailAction::Add { person, value, label } => {
                let email = book.add_email_address(person, &value, label.as_deref())?;
                println!("Added {}", email);
            }
            DetailAction::Delete { id } => {
                book.delete_email_address(id)?;
                println!("Deleted email address #{}", id);
            }
        },
        Commands::Address { action } => match action {
            AddressAction::Add {
                person,
                label,
                house_number,
                street,
                line1,
                line2,
                city,
                postal_code,
                country,
            } => {
                let fields = AddressFields {
                    label,
                    house_number,
                    street_name: street,
                    address_line_1: line1,
                    address_line_2: line2,
                    city,
                    postal_code,
                    country,
                };
                let address = book.add_address(person, &fields)?;
                println!("Added {}", address);
            }
            AddressAction::Delete { id } => {
                book.delete_address(id)?;
                println!("Deleted address #{}", id);
            }
        },
        Commands::Stats => show_stats(&book)?,
        // handled before the database is opened
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn handle_group_command(book: &mut ContactBook, action: GroupAction, color: bool) -> Result<()> {
    match action {
        GroupAction::List => {
            output::print_groups(&book.get_all_groups()?, color)?;
        }
        GroupAction::Create { name } => {
            let group = book.create_group(&name)?;
            println!("Created group {} (#{})", group.name, group.id);
        }
        GroupAction::Delete { id } => {
            book.delete_group(id)?;
            println!("Deleted group #{}", id);
        }
        GroupAction::Rename { id, name } => {
            let group = book.rename_group(id, &name)?;
            println!("Renamed group #{} to {}", group.id, group.name);
        }
        GroupAction::Assign { person, group } => {
            book.add_group_to_person(person, group)?;
            println!("Person #{} is now in group #{}", person, group);
        }
        GroupAction::Unassign { person, group } => {
            if book.remove_group_from_person(person, group)? {
                println!("Removed person #{} from group #{}", person, group);
            } else {
                println!("Person #{} was not in group #{}", person, group);
            }
        }
    }

    Ok(())
}

fn configure(
    mut config: AppConfig,
    database: Option<PathBuf>,
    log_filter: Option<String>,
) -> Result<()> {
    if database.is_none() && log_filter.is_none() {
        println!("Config file: {}", get_config_path()?.display());
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    if database.is_some() {
        config.database_path = database;
    }
    if let Some(filter) = log_filter {
        config.log_filter = filter;
    }
    config.save()?;
    println!("Configuration saved");
    Ok(())
}

/// Apply a name flag: absent keeps the value, empty clears it
fn apply_name(field: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value {
        *field = Some(value).filter(|v| !v.is_empty());
    }
}
