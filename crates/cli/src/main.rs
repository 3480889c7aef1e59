use clap::{Parser, Subcommand};
use registration_core::{
    assemble_with, validate_form, AddressTemplate, AssemblyOptions, FieldKey, FormFile,
    FormSection, FormState, NonEmptyText,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "register")]
#[command(about = "Patient registration form tools")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a blank form file
    Init,
    /// Validate a form file and list invalid fields by section
    Validate {
        /// Form file (YAML or JSON)
        form: PathBuf,
        /// Date to treat as today (YYYY-MM-DD); defaults to the local date
        #[arg(long)]
        today: Option<String>,
    },
    /// Print the submission payload a form file assembles to
    Assemble {
        /// Form file (YAML or JSON)
        form: PathBuf,
        /// Person-attribute type for the telephone number
        #[arg(long)]
        attribute_type: Option<String>,
    },
    /// Show the address fields an address template enables, in display order
    Template {
        /// Address template (JSON)
        template: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => {
            print!("{}", FormFile::render(&FormState::new())?);
        }
        Some(Commands::Validate { form, today }) => {
            let state = FormFile::load(&form)?;
            let today = match today {
                Some(t) => chrono::NaiveDate::parse_from_str(&t, "%Y-%m-%d")?,
                None => chrono::Local::now().date_naive(),
            };
            let result = validate_form(&state, today);

            for section in FormSection::ALL {
                println!("{}", section.title());
                for field in section.fields() {
                    match result.get(field) {
                        Some(v) if v.valid => println!("  ok       {field}"),
                        Some(v) => println!(
                            "  invalid  {field}: {}",
                            v.message.as_deref().unwrap_or("")
                        ),
                        None => println!("  inactive {field}"),
                    }
                }
            }

            if !result.is_valid() {
                return Err(format!("{} invalid field(s)", result.errors().len()).into());
            }
        }
        Some(Commands::Assemble {
            form,
            attribute_type,
        }) => {
            let state = FormFile::load(&form)?;
            let options = match attribute_type {
                Some(t) => AssemblyOptions {
                    person_attribute_type: NonEmptyText::new(t)?,
                },
                None => AssemblyOptions::default(),
            };
            let payload = assemble_with(&state, &options);
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Some(Commands::Template { template }) => {
            let text = std::fs::read_to_string(&template)?;
            let template = AddressTemplate::parse_json(&text)?;
            let fields = template.ordered_fields();
            if fields.is_empty() {
                println!("No known address fields.");
            }
            for (key, field) in fields {
                println!(
                    "{:>3}  {:<14} {}",
                    field.display_order,
                    key.as_str(),
                    field.label_key
                );
            }
            let shown: Vec<FieldKey> = template.ordered_fields().iter().map(|(k, _)| *k).collect();
            let hidden: Vec<&str> = FieldKey::ADDRESS
                .iter()
                .filter(|k| !shown.contains(*k))
                .map(|k| k.as_str())
                .collect();
            if !hidden.is_empty() {
                println!("Not in template: {}", hidden.join(", "));
            }
        }
        None => {
            println!("Use 'register --help' for commands");
        }
    }

    Ok(())
}
