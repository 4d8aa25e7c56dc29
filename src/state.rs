use crate::{
    config::RuntimeConfiguration,
    controller::Controller,
    data::student::StudentClient,
    routes::students::student_columns,
    transport::{HttpTransport, Transport},
};
use maud::{DOCTYPE, Markup, html};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

#[derive(Clone, Debug)]
pub struct RosterState {
    config: RuntimeConfiguration,
    controller: Arc<Mutex<Controller>>,
}

impl RosterState {
    pub fn new(config: RuntimeConfiguration) -> Self {
        let transport = Arc::new(HttpTransport::new(&config.api_config()));
        Self::with_transport(config, transport)
    }

    pub fn with_transport(config: RuntimeConfiguration, transport: Arc<dyn Transport>) -> Self {
        let controller = Controller::new(StudentClient::new(transport), student_columns());

        Self {
            config,
            controller: Arc::new(Mutex::new(controller)),
        }
    }

    pub fn config(&self) -> &RuntimeConfiguration {
        &self.config
    }

    /// Held for the whole of an action, so actions from concurrent requests apply one at a time.
    pub async fn controller(&self) -> MutexGuard<'_, Controller> {
        self.controller.lock().await
    }

    #[allow(clippy::unused_self)]
    pub fn render(&self, markup: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="UTF-8" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                    script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
                    script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                    title { "Roster" }
                }
                body class="bg-gray-900 min-h-screen flex flex-col items-center pt-8 text-white" {
                    (markup)
                }
            }
        }
    }
}
