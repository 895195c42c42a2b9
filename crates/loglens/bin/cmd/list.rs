use chrono::Utc;
use clap::{Args, ValueEnum};
use colored::Colorize;
use eyre::{eyre, Result};
use loglens::views::{
    containers_grid, dashboard_view, images_grid, volumes_grid, ContainerCard, Grid, StatusClass,
    DASHBOARD_FAILED,
};
use loglens::{Backend, ContainerFilter, FetchError, Format, HttpBackend};
use prettytable::{Cell, Row, Table};
use serde::Serialize;

use super::BackendArgs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListTarget {
    Containers,
    Images,
    Volumes,
    Dashboard,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// What to list
    #[arg(value_enum)]
    pub what: ListTarget,

    /// Container filter: all, running or stopped
    #[arg(long, default_value = "all")]
    pub filter: ContainerFilter,

    /// Output format: table, json or json-pretty
    #[arg(long, default_value = "table")]
    pub format: Format,
}

impl ListArgs {
    pub fn run(&self, backend_args: &BackendArgs) -> Result<()> {
        let backend = backend_args.backend();
        tracing::debug!(url = backend.base_url(), what = ?self.what, "listing");

        match self.format {
            Format::Table => self.print_table(&backend),
            Format::Json | Format::JsonPretty => self.print_json(&backend),
        }
    }

    fn print_json(&self, backend: &HttpBackend) -> Result<()> {
        match self.what {
            ListTarget::Containers => emit_json(&self.fetch(backend.containers(self.filter))?, self.format),
            ListTarget::Images => emit_json(&self.fetch(backend.images())?, self.format),
            ListTarget::Volumes => emit_json(&self.fetch(backend.volumes())?, self.format),
            ListTarget::Dashboard => emit_json(&self.fetch(backend.dashboard())?, self.format),
        }
    }

    fn fetch<T>(&self, result: Result<T, FetchError>) -> Result<T> {
        result.map_err(|e| eyre!("Failed to load {:?}: {}", self.what, e))
    }

    fn print_table(&self, backend: &HttpBackend) -> Result<()> {
        match self.what {
            ListTarget::Containers => {
                let grid = containers_grid(backend.containers(self.filter));
                println!(
                    "\n{} (filter: {})",
                    "Containers".bold(),
                    self.filter.as_str().cyan()
                );
                print_grid(&grid, containers_table)
            }
            ListTarget::Images => {
                let grid = images_grid(backend.images(), Utc::now());
                println!("\n{}", "Images".bold());
                print_grid(&grid, |cards| {
                    let mut table = Table::new();
                    table.add_row(header(&["Name", "ID", "Created", "Size"]));
                    for card in cards {
                        table.add_row(Row::new(vec![
                            Cell::new(&card.name),
                            Cell::new(&card.short_id),
                            Cell::new(&card.created),
                            Cell::new(&card.size),
                        ]));
                    }
                    table
                })
            }
            ListTarget::Volumes => {
                let grid = volumes_grid(backend.volumes());
                println!("\n{}", "Volumes".bold());
                print_grid(&grid, |cards| {
                    let mut table = Table::new();
                    table.add_row(header(&["Name", "Scope", "Driver", "Mountpoint"]));
                    for card in cards {
                        table.add_row(Row::new(vec![
                            Cell::new(&card.display_name),
                            Cell::new(&card.scope),
                            Cell::new(&card.driver),
                            Cell::new(&card.mountpoint),
                        ]));
                    }
                    table
                })
            }
            ListTarget::Dashboard => {
                let view = dashboard_view(backend.dashboard());
                let (Some(total), Some(running)) = (view.total_containers, view.running_containers)
                else {
                    return Err(eyre!(DASHBOARD_FAILED));
                };
                println!("\n{}", "Dashboard".bold());
                println!("  {}: {}", "Total containers".dimmed(), total);
                println!("  {}: {}", "Running containers".dimmed(), running);
                println!("\n{}", "Running".bold());
                print_grid(&view.running, containers_table)
            }
        }
    }
}

fn emit_json<T: Serialize>(value: &T, format: Format) -> Result<()> {
    let json = if format == Format::JsonPretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

fn print_grid<T>(grid: &Grid<T>, table: impl FnOnce(&[T]) -> Table) -> Result<()> {
    match grid {
        Grid::Cards(cards) => {
            table(cards).printstd();
            Ok(())
        }
        Grid::Empty(message) => {
            println!("{}", message.yellow());
            Ok(())
        }
        Grid::Failed(message) => Err(eyre!(message.clone())),
    }
}

fn header(titles: &[&str]) -> Row {
    Row::new(titles.iter().map(|title| Cell::new(title).style_spec("b")).collect())
}

fn containers_table(cards: &[ContainerCard]) -> Table {
    let mut table = Table::new();
    table.add_row(header(&["ID", "Name", "Image", "State"]));
    for card in cards {
        table.add_row(Row::new(vec![
            Cell::new(&card.short_id),
            Cell::new(&card.name),
            Cell::new(&card.image),
            Cell::new(&card.state).style_spec(state_style(card.status)),
        ]));
    }
    table
}

fn state_style(status: StatusClass) -> &'static str {
    match status {
        StatusClass::Running => "Fg",
        StatusClass::Paused | StatusClass::Restarting => "Fy",
        StatusClass::Exited | StatusClass::Dead => "Fr",
        StatusClass::Created | StatusClass::Other => "",
    }
}
