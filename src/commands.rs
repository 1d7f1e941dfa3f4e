use crate::{OutputMode, emit_success};
use anyhow::Context;
use quizstore::config::{write_config, QuizConfig};
use quizstore::ui::{self, Icons};
use quizstore::{seed, Constraint, QuizStore};
use std::path::Path;

fn open_store(database: &Path, echo: bool) -> anyhow::Result<QuizStore> {
    QuizStore::open_with_echo(database, echo)
        .with_context(|| format!("failed to open database {}", database.display()))
}

pub fn run_init(database: &Path, echo: bool, output_mode: OutputMode) -> anyhow::Result<()> {
    let store = open_store(database, echo)?;
    let tables = store.table_names()?;
    store.close()?;

    if output_mode.is_human() {
        ui::success(&format!("Schema ready in {}", database.display()));
        ui::summary_row("Tables:", &tables.join(", "));
    } else {
        let data = serde_json::json!({
            "database": database.display().to_string(),
            "tables": tables,
        });
        emit_success(output_mode, "init", data)?;
    }
    Ok(())
}

pub fn run_seed(database: &Path, echo: bool, output_mode: OutputMode) -> anyhow::Result<()> {
    if output_mode.is_human() {
        ui::header(&format!("Seeding {}", database.display()));
    }

    let mut store = open_store(database, echo)?;
    let report = match seed::seed(&mut store) {
        Ok(report) => report,
        Err(e) if e.constraint() == Some(Constraint::Unique) => {
            return Err(e).context("database already contains the sample data");
        }
        Err(e) => return Err(e.into()),
    };
    let stats = store.stats()?;
    store.close()?;

    if output_mode.is_human() {
        print!("{}", report);
        ui::success("Seed committed");
        println!("{}", ui::stats_table(&stats));
    } else {
        let data = serde_json::json!({
            "database": database.display().to_string(),
            "seeded": report,
            "stats": stats,
        });
        emit_success(output_mode, "seed", data)?;
    }
    Ok(())
}

pub fn run_stats(database: &Path, echo: bool, output_mode: OutputMode) -> anyhow::Result<()> {
    let store = open_store(database, echo)?;
    let stats = store.stats()?;
    store.close()?;

    if output_mode.is_human() {
        println!("{} Quizstore Statistics ({})", Icons::STATS, database.display());
        println!("{}", ui::stats_table(&stats));
    } else {
        emit_success(output_mode, "stats", serde_json::to_value(&stats)?)?;
    }
    Ok(())
}

pub fn run_show(database: &Path, echo: bool, output_mode: OutputMode) -> anyhow::Result<()> {
    let store = open_store(database, echo)?;
    let students = store.list_students()?;
    let topics = store.list_topics()?;
    let quizzes = store.list_quizzes()?;
    let results = store.list_results()?;
    store.close()?;

    if output_mode.is_human() {
        for (title, rendered) in [
            ("Students", ui::students_table(&students)),
            ("Topics", ui::topics_table(&topics)),
            ("Quizzes", ui::quizzes_table(&quizzes)),
            ("Results", ui::results_table(&results)),
        ] {
            ui::section(title);
            if rendered.is_empty() {
                println!("  (none)");
            } else {
                println!("{}", rendered);
            }
        }
    } else {
        let data = serde_json::json!({
            "students": students,
            "topics": topics,
            "quizzes": quizzes,
            "results": results,
        });
        emit_success(output_mode, "show", data)?;
    }
    Ok(())
}

pub fn run_config(config_path: &Path, database: &Path, force: bool, output_mode: OutputMode) -> anyhow::Result<()> {
    let config = QuizConfig {
        database: Some(database.display().to_string()),
    };
    write_config(config_path, &config, force)?;

    if output_mode.is_human() {
        ui::success(&format!("Wrote {}", config_path.display()));
        ui::info("database", &database.display().to_string());
    } else {
        let data = serde_json::json!({
            "config": config_path.display().to_string(),
            "database": database.display().to_string(),
        });
        emit_success(output_mode, "config", data)?;
    }
    Ok(())
}
