//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire config, logging and the SQLite store into one scripted session.
//! - Print the resulting catalog as JSON for quick local sanity checks.

use log::{error, info};
use showbill_core::{
    init_logging, CoreConfig, DomainObject, LoggerRegistry, PosterKind, ShowbillService,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let config = CoreConfig::from_env();

    if let Err(err) = init_logging(&config.log_level, config.log_target.clone()) {
        eprintln!("showbill: logging disabled: {err}");
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("showbill: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &CoreConfig) -> Result<(), Box<dyn Error>> {
    let conn = config.open_db()?;
    let mut loggers = LoggerRegistry::new();
    let mut service =
        ShowbillService::try_new(&conn)?.with_logger(loggers.get_or_create("main"));

    let concerts = service.create_category("Concerts", None)?;
    let jazz = service.create_category("Jazz", Some(concerts.id()))?;
    service.create_poster(PosterKind::Music, "Autumn Jazz Night", jazz.id())?;
    service.create_poster(PosterKind::Music, "Symphony Hall", concerts.id())?;

    service.register_person("Vera")?;
    service.register_person("Oleg")?;
    service.add_person_to_poster("Autumn Jazz Night", "Vera")?;
    service.add_person_to_poster("Autumn Jazz Night", "Oleg")?;
    service.copy_poster("Autumn Jazz Night")?;

    info!(
        "event=cli_run module=cli status=ok categories={} jazz_poster_count={}",
        service.categories().len(),
        jazz.poster_count()
    );

    println!("showbill_core version={}", showbill_core::core_version());
    println!("{}", serde_json::to_string_pretty(&service.poster_snapshots())?);
    for person in service.list_persons()? {
        println!("person id={:?} name={}", person.id(), person.name);
    }
    Ok(())
}
