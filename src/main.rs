use clap::{Parser, Subcommand};
use simple_blog::config::{self, Project};
use simple_blog::{output, site};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "simple-blog")]
#[command(about = "Static site generator for template-driven blogs")]
#[command(long_about = "\
Static site generator for template-driven blogs

Run without arguments from the project root to build the site into public/.

Project structure:

  blog/
  ├── config.toml                  # Optional layout overrides
  ├── index.css                    # Copied verbatim to public/index.css
  ├── components/                  # Fragments, available in every template
  │   ├── header.html              # → {{ header|safe }}
  │   └── footer.html              # → {{ footer|safe }}
  ├── templates/
  │   ├── article-template.html    # Rendered once per article
  │   └── index.html               # Rendered with {{ articles }}
  └── articles/
      ├── 2021-03-hello/
      │   ├── metadata.json        # {\"title\", \"url\", \"pub_date\", ...}
      │   └── body.html            # → {{ body|safe }}
      └── drafts/                  # Missing a file = skipped

Output:

  public/index.html, public/<url>.html for every article, public/index.css

The output directory is deleted and recreated on every build.

Run 'simple-blog gen-config' to print a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Project root directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Build the site (the default when no command is given)
    Build,
    /// Load and validate content and templates without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Build) {
        Command::Build => {
            let project = Project::open(&cli.root)?;
            println!("==> Building {}", project.root.display());
            let report = site::render_site(&project, &mut |event| {
                output::print_build_event(&event, &project.root, &project.config);
            })?;
            output::print_build_summary(&report, &project.root);
        }
        Command::Check => {
            let project = Project::open(&cli.root)?;
            println!("==> Checking {}", project.root.display());
            let content = site::check_site(&project)?;
            output::print_check_output(&content, &project.root, &project.config);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
