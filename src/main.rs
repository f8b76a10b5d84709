mod color;
mod config;
mod dataset;
mod graph;
mod reducer;
mod search;
mod state;
mod view;

use iced::widget::canvas;
use iced::{Element, Length, Task, Theme};
use std::path::PathBuf;

use config::Config;
use graph::Graph;
use view::{GraphView, ViewMessage};

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("skein=info")),
        )
        .init();

    iced::application(init, update, view)
        .title("Skein")
        .theme(theme)
        .antialiasing(true)
        .window_size(view::DEFAULT_VIEWPORT)
        .run()
}

fn theme(_state: &Skein) -> Theme {
    Theme::Dark
}

fn init() -> (Skein, Task<Message>) {
    let mut config = Config::load().unwrap_or_default();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.dataset_path.clone());

    // A missing or broken graph file is not fatal: start with an empty
    // view and say so in the log.
    let graph = match &path {
        Some(path) => match dataset::load(path) {
            Ok(data) => {
                config.remember_dataset(path);
                Graph::from_dataset(&data)
            }
            Err(err) => {
                tracing::error!("could not load {}: {err:#}", path.display());
                Graph::default()
            }
        },
        None => {
            tracing::warn!("no graph file given and none remembered, starting empty");
            Graph::default()
        }
    };

    let view = GraphView::new(graph, &config);
    (Skein { view, config }, Task::none())
}

#[derive(Debug, Clone)]
pub enum Message {
    View(ViewMessage),
}

struct Skein {
    view: GraphView,
    config: Config,
}

fn update(state: &mut Skein, message: Message) -> Task<Message> {
    match message {
        Message::View(msg) => {
            state.view.update(msg, &mut state.config);
        }
    }
    Task::none()
}

fn view(state: &Skein) -> Element<'_, Message> {
    canvas(&state.view)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
