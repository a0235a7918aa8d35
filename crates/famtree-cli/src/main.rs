//! `famtree`: command-line editor for a family tree.
//!
//! # Usage
//!
//! ```
//! famtree tree --search goa
//! famtree --url http://localhost:8080 add "Iris Salian" --parent 6 --born 2021
//! famtree --config ~/.config/famtree/config.toml export family.json
//! ```
//!
//! With a reachable `--url` the commands go through the server's API;
//! otherwise they edit the local SQLite file given by `--db`.

mod backend;
mod client;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use backend::Backend;
use chrono::Datelike as _;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use famtree_core::{
  Gender, NewPerson, Person, PersonId, editor, sample::sample_family, store::FamilyStore,
};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "famtree", about = "Edit and browse a family tree")]
struct Args {
  /// Path to a TOML config file (url, db, family_name).
  #[arg(short, long, value_name = "FILE", env = "FAMTREE_CONFIG")]
  config: Option<PathBuf>,

  /// Base URL of a famtree server, e.g. http://localhost:8080.
  #[arg(long, env = "FAMTREE_URL")]
  url: Option<String>,

  /// Local SQLite file used when no server is reachable.
  #[arg(long, value_name = "PATH", env = "FAMTREE_DB")]
  db: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Print the family tree.
  Tree {
    /// Only show matches by name or location, with their relatives.
    #[arg(short, long)]
    search: Option<String>,
  },
  /// List everyone, one per line.
  List,
  /// Show one person with their parent and children.
  Show { id: String },
  /// Add a person, optionally as the child of `--parent`.
  Add {
    name: String,
    #[arg(long)]
    parent: Option<String>,
    #[command(flatten)]
    details: Details,
  },
  /// Add a new root person as the parent of CHILD.
  AddParent {
    child: String,
    name: String,
    #[command(flatten)]
    details: Details,
  },
  /// Change a person's fields.
  Edit {
    id: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long, conflicts_with = "no_parent")]
    parent: Option<String>,
    /// Make this person a root.
    #[arg(long)]
    no_parent: bool,
    /// Unset an optional field (repeatable).
    #[arg(long, value_enum)]
    clear: Vec<Field>,
    #[command(flatten)]
    details: Details,
  },
  /// Delete a person who has no children.
  Delete { id: String },
  /// Put siblings in the given order.
  Reorder {
    #[arg(required = true)]
    ids: Vec<String>,
  },
  /// Write the record as JSON to FILE, or stdout.
  Export { file: Option<PathBuf> },
  /// Replace the record with the JSON array in FILE.
  Import { file: PathBuf },
  /// Load the sample family.
  Seed {
    /// Replace existing data.
    #[arg(long)]
    force: bool,
  },
}

/// Optional person fields shared by `add`, `add-parent` and `edit`.
#[derive(ClapArgs, Debug, Default)]
struct Details {
  #[arg(long)]
  nickname: Option<String>,
  #[arg(long)]
  born:     Option<i32>,
  #[arg(long)]
  died:     Option<i32>,
  #[arg(long)]
  location: Option<String>,
  #[arg(long)]
  gender:   Option<Gender>,
  #[arg(long)]
  spouse:   Option<String>,
  /// Position among siblings; wins over birth year.
  #[arg(long)]
  order:    Option<i32>,
  #[arg(long)]
  photo:    Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
  Nickname,
  Born,
  Died,
  Location,
  Spouse,
  Order,
  Photo,
}

impl Details {
  fn into_draft(self, name: String) -> NewPerson {
    NewPerson {
      name,
      nickname: self.nickname,
      birth_year: self.born,
      death_year: self.died,
      location: self.location,
      gender: self.gender.unwrap_or_default(),
      parent_id: None,
      spouse: self.spouse,
      sibling_order: self.order,
      photo_url: self.photo,
    }
  }

  fn apply(self, person: &mut Person) {
    if let Some(v) = self.nickname {
      person.nickname = Some(v);
    }
    if let Some(v) = self.born {
      person.birth_year = Some(v);
    }
    if let Some(v) = self.died {
      person.death_year = Some(v);
    }
    if let Some(v) = self.location {
      person.location = Some(v);
    }
    if let Some(v) = self.gender {
      person.gender = v;
    }
    if let Some(v) = self.spouse {
      person.spouse = Some(v);
    }
    if let Some(v) = self.order {
      person.sibling_order = Some(v);
    }
    if let Some(v) = self.photo {
      person.photo_url = Some(v);
    }
  }
}

fn clear(person: &mut Person, field: Field) {
  match field {
    Field::Nickname => person.nickname = None,
    Field::Born => person.birth_year = None,
    Field::Died => person.death_year = None,
    Field::Location => person.location = None,
    Field::Spouse => person.spouse = None,
    Field::Order => person.sibling_order = None,
    Field::Photo => person.photo_url = None,
  }
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:         String,
  #[serde(default)]
  db:          Option<PathBuf>,
  #[serde(default)]
  family_name: String,
}

fn default_db() -> PathBuf {
  match std::env::var("HOME") {
    Ok(home) => PathBuf::from(home).join(".local/share/famtree/family.db"),
    Err(_) => PathBuf::from("famtree.db"),
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let url = args
    .url
    .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()));
  let db = args.db.or(file_cfg.db).unwrap_or_else(default_db);
  let family_name = if file_cfg.family_name.is_empty() {
    famtree_core::hierarchy::DEFAULT_FAMILY_LABEL.to_string()
  } else {
    file_cfg.family_name
  };

  let backend = Backend::connect(url.as_deref(), &db)
    .await
    .with_context(|| format!("opening store at {}", db.display()))?;
  tracing::debug!(backend = backend.describe(), "connected");

  run(&backend, args.command, &family_name).await
}

fn current_year() -> i32 { chrono::Local::now().year() }

async fn run(store: &Backend, command: Command, family_name: &str) -> Result<()> {
  match command {
    Command::Tree { search } => {
      match editor::load_tree(store, search.as_deref(), family_name).await? {
        Some(tree) => print!("{}", render::render_tree(&tree, current_year())),
        None => println!("(no one to show)"),
      }
    }

    Command::List => {
      let year = current_year();
      for person in editor::snapshot(store).await? {
        println!("{:>8}  {}", person.id.to_string(), render::person_line(&person, year));
      }
    }

    Command::Show { id } => {
      let profile = editor::profile(store, PersonId::parse(&id)).await?;
      print!("{}", render::render_profile(&profile, current_year()));
    }

    Command::Add {
      name,
      parent,
      details,
    } => {
      let mut draft = details.into_draft(name);
      draft.parent_id = parent.as_deref().map(PersonId::parse);
      let person = editor::add_person(store, draft).await?;
      println!("added {} ({})", person.name, person.id);
    }

    Command::AddParent {
      child,
      name,
      details,
    } => {
      let draft = details.into_draft(name);
      let inserted = editor::add_parent(store, PersonId::parse(&child), draft).await?;
      println!(
        "added {} ({}) as parent of {}",
        inserted.parent.name, inserted.parent.id, inserted.child.name
      );
    }

    Command::Edit {
      id,
      name,
      parent,
      no_parent,
      clear: fields,
      details,
    } => {
      let mut person = editor::get_person(store, PersonId::parse(&id)).await?;
      if let Some(name) = name {
        person.name = name;
      }
      if let Some(parent) = parent {
        person.parent_id = Some(PersonId::parse(&parent));
      }
      if no_parent {
        person.parent_id = None;
      }
      for field in fields {
        clear(&mut person, field);
      }
      details.apply(&mut person);
      let saved = editor::update_person(store, person).await?;
      println!("updated {} ({})", saved.name, saved.id);
    }

    Command::Delete { id } => {
      let id = PersonId::parse(&id);
      editor::delete_person(store, id.clone()).await?;
      println!("deleted {id}");
    }

    Command::Reorder { ids } => {
      let ids: Vec<PersonId> = ids.iter().map(|s| PersonId::parse(s)).collect();
      for person in editor::reorder_siblings(store, &ids).await? {
        println!("{:>3}  {}", person.sibling_order.unwrap_or_default(), person.name);
      }
    }

    Command::Export { file } => {
      let text = editor::export_people(store).await?;
      match file {
        Some(path) => {
          std::fs::write(&path, text)
            .with_context(|| format!("writing {}", path.display()))?;
          eprintln!("exported to {}", path.display());
        }
        None => println!("{text}"),
      }
    }

    Command::Import { file } => {
      let text = std::fs::read_to_string(&file)
        .with_context(|| format!("reading {}", file.display()))?;
      let report = editor::import_people(store, &text).await?;
      for warning in &report.warnings {
        eprintln!("warning: {warning}");
      }
      println!("imported {} people", report.people.len());
    }

    Command::Seed { force } => {
      let existing = editor::snapshot(store).await?.len();
      if existing > 0 && !force {
        bail!("store already holds {existing} people; pass --force to replace them");
      }
      let family = sample_family();
      let count = family.len();
      store.replace_all(family).await?;
      println!("seeded {count} people");
    }
  }
  Ok(())
}
