#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, BufReader};

mod api;
mod app;
mod prefs;
mod settings;

use crate::app::{SearchCommand, SearchScreen, SearchViewModelFactory};
use crate::settings::SearchSettings;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    let settings = SearchSettings::new_from_env();
    if settings.api_key.is_none() {
        warn!("KAKAO_REST_API_KEY is not set, searches will fail");
    }
    info!("storing preferences in {}", settings.data_dir.display());

    let model = match SearchViewModelFactory::new(settings).create() {
        Ok(model) => Arc::new(model),
        Err(err) => {
            error!("Could not set up the search screen: {}", err);
            std::process::exit(1);
        }
    };

    let screen = SearchScreen::new(model);
    println!("{}", screen.render_initial_state());
    screen.start();

    let mut lines = BufReader::new(io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                error!("Could not read input: {}", err);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<SearchCommand>() {
            Ok(command) => {
                if !screen.handle(command) {
                    break;
                }
            }
            Err(err) => println!("{}", err),
        }
    }
}
