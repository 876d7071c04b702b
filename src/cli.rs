use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{Datelike, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};

use crate::calendar::MiniCalendar;
use crate::config::{SiteConfig, DEFAULT_CONFIG_PATH};
use crate::confirm::{AssumeYes, Confirm, StdinConfirm};
use crate::guestbook::{FragmentFile, Guestbook, SystemClock};
use crate::nav;
use crate::notify::{KeepLast, Notification, TerminalNotifier};
use crate::render::{self, PageContext};
use crate::store::{namespaced, Storage};
use crate::visitors;

#[derive(Parser, Debug)]
#[command(name = "kuranie", version, about = "Guestbook, visitor counter and page rendering for the kuranie site")]
pub struct Cli {
    /// Site config file
    #[arg(long, global = true, env = "KURANIE_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Keep everything in memory; nothing is persisted
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Answer yes to confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read, sign or clear the guestbook
    Guestbook {
        #[command(subcommand)]
        action: GuestbookAction,
    },
    /// Count a visit and print the new total
    Visit,
    /// Print the mini calendar for a month
    Calendar {
        /// Day to highlight (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Render a page template (counts a visit, like a page load)
    Render {
        template: PathBuf,
        /// Output file; defaults to the template name under output_dir
        #[arg(long)]
        out: Option<PathBuf>,
        /// URL path the page is served at, for nav highlighting
        #[arg(long)]
        path: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum GuestbookAction {
    /// List entries, newest first
    List,
    /// Add an entry
    Sign {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long)]
        message: String,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Remove every entry (asks first)
    Clear {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Print the guestbook container HTML
    Show,
}

/// Re-render a page after a guestbook change so the outcome shows as a toast.
#[derive(Args, Debug, Default)]
pub struct PageArgs {
    /// Page template to render afterwards
    #[arg(long = "render", value_name = "TEMPLATE")]
    pub template: Option<PathBuf>,
    /// Output file for --render; defaults to the template name under output_dir
    #[arg(long, requires = "template")]
    pub out: Option<PathBuf>,
    /// URL path of the rendered page, for nav highlighting
    #[arg(long, requires = "template")]
    pub path: Option<String>,
}

pub fn run(cli: &Cli, config: &SiteConfig, storage: &dyn Storage) -> Result<ExitCode, String> {
    match &cli.command {
        Command::Guestbook { action } => run_guestbook(cli, config, storage, action),
        Command::Visit => {
            let key = namespaced(&config.namespace, "visitors");
            let count = visitors::increment(storage, &key)?;
            println!("{}", visitors::format_count(count));
            Ok(ExitCode::SUCCESS)
        }
        Command::Calendar { date } => {
            let today = date.unwrap_or_else(|| today_in(config));
            println!("{}", MiniCalendar::for_date(today).render());
            Ok(ExitCode::SUCCESS)
        }
        Command::Render { template, out, path } => {
            let out = out.clone().unwrap_or_else(|| default_output(config, template));
            let page_path = path.clone().unwrap_or_else(|| default_page_path(template));
            render_template(config, storage, template, &out, &page_path, None)?;
            println!("{}", out.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_guestbook(
    cli: &Cli,
    config: &SiteConfig,
    storage: &dyn Storage,
    action: &GuestbookAction,
) -> Result<ExitCode, String> {
    let notifier = KeepLast::new(TerminalNotifier);
    let view = FragmentFile { path: fragment_path(config) };
    let clock = SystemClock;
    let guestbook = Guestbook::new(storage, &notifier, &view, &clock, config);

    match action {
        GuestbookAction::List => {
            let entries = guestbook.load();
            if entries.is_empty() {
                println!("No guestbook entries yet.");
            }
            let tz = config.tz();
            for entry in &entries {
                let date = render::format_entry_date(entry, tz);
                println!("{}  {}\n    {}", date, entry.name, entry.message);
            }
            Ok(ExitCode::SUCCESS)
        }
        GuestbookAction::Sign { name, message, page } => {
            let added = guestbook.append(name, message)?;
            render_after(config, storage, page, notifier.take())?;
            match added {
                Some(_) => Ok(ExitCode::SUCCESS),
                None => Ok(ExitCode::FAILURE),
            }
        }
        GuestbookAction::Clear { page } => {
            let confirm: &dyn Confirm = if cli.yes { &AssumeYes } else { &StdinConfirm };
            guestbook.clear(confirm)?;
            render_after(config, storage, page, notifier.take())?;
            Ok(ExitCode::SUCCESS)
        }
        GuestbookAction::Show => {
            println!("{}", guestbook.render(&guestbook.load()));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn render_after(
    config: &SiteConfig,
    storage: &dyn Storage,
    page: &PageArgs,
    notification: Option<Notification>,
) -> Result<(), String> {
    let Some(template) = &page.template else {
        return Ok(());
    };
    let out = page.out.clone().unwrap_or_else(|| default_output(config, template));
    let page_path = page.path.clone().unwrap_or_else(|| default_page_path(template));
    render_template(config, storage, template, &out, &page_path, notification)?;
    println!("{}", out.display());
    Ok(())
}

/// The page-load event: every widget fills its placeholder. `notification`
/// becomes the page's toast, if any.
pub fn render_template(
    config: &SiteConfig,
    storage: &dyn Storage,
    template: &Path,
    out: &Path,
    page_path: &str,
    notification: Option<Notification>,
) -> Result<(), String> {
    let source = std::fs::read_to_string(template)
        .map_err(|e| format!("Cannot read {}: {}", template.display(), e))?;

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }
    std::fs::create_dir_all(&config.output_dir).map_err(|e| e.to_string())?;

    let notifier = TerminalNotifier;
    let view = FragmentFile { path: fragment_path(config) };
    let clock = SystemClock;
    let guestbook = Guestbook::new(storage, &notifier, &view, &clock, config);
    let entries = guestbook.refresh();

    let today = today_in(config);
    let ctx = PageContext {
        site_name: config.site_name.clone(),
        visitor_count: visitors::record_visit(storage, &namespaced(&config.namespace, "visitors")),
        nav_html: nav::render_nav(&config.nav, page_path),
        calendar_html: MiniCalendar::for_date(today).render(),
        guestbook_html: guestbook.render(&entries),
        notification,
        current_year: today.year(),
    };

    let html = render::render_page(&source, &ctx, &config.moods, &mut rand::thread_rng());
    std::fs::write(out, html).map_err(|e| format!("Cannot write {}: {}", out.display(), e))?;
    log::info!("Rendered {} -> {}", template.display(), out.display());
    Ok(())
}

fn today_in(config: &SiteConfig) -> NaiveDate {
    Utc::now().with_timezone(&config.tz()).date_naive()
}

fn fragment_path(config: &SiteConfig) -> PathBuf {
    Path::new(&config.output_dir).join("gb-entries.html")
}

fn default_output(config: &SiteConfig, template: &Path) -> PathBuf {
    let name = template
        .file_name()
        .map(|n| n.to_string_lossy().trim_end_matches(".tmpl").to_string())
        .unwrap_or_else(|| "index.html".to_string());
    Path::new(&config.output_dir).join(name)
}

fn default_page_path(template: &Path) -> String {
    let name = template
        .file_name()
        .map(|n| n.to_string_lossy().trim_end_matches(".tmpl").to_string())
        .unwrap_or_default();
    format!("/{}", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sign() {
        let cli = Cli::try_parse_from(["kuranie", "guestbook", "sign", "--message", "hi"]).unwrap();
        match cli.command {
            Command::Guestbook { action: GuestbookAction::Sign { name, message, page } } => {
                assert_eq!(name, "");
                assert_eq!(message, "hi");
                assert!(page.template.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_sign_with_render() {
        let cli = Cli::try_parse_from([
            "kuranie", "guestbook", "sign", "--message", "hi", "--render", "index.html", "--path", "/",
        ])
        .unwrap();
        match cli.command {
            Command::Guestbook { action: GuestbookAction::Sign { page, .. } } => {
                assert_eq!(page.template, Some(PathBuf::from("index.html")));
                assert_eq!(page.path.as_deref(), Some("/"));
                assert!(page.out.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_out_requires_render() {
        assert!(Cli::try_parse_from(["kuranie", "guestbook", "clear", "--out", "x.html"]).is_err());
    }

    #[test]
    fn test_default_page_path_from_template() {
        assert_eq!(default_page_path(Path::new("pages/about.html.tmpl")), "/about.html");
        assert_eq!(default_page_path(Path::new("index.html")), "/index.html");
    }
}
