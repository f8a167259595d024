// src/client/activities.rs

use crate::client::{CanteiroClient, Outcome};
use crate::models::movement::Activity;

pub struct ActivitiesView {
    client: CanteiroClient,
    pub activities: Vec<Activity>,
    pub error: Option<String>,
    pub loading: bool,
    pub refreshing: bool,
}

impl ActivitiesView {
    pub fn new(client: CanteiroClient) -> Self {
        Self {
            client,
            activities: Vec::new(),
            error: None,
            loading: true,
            refreshing: false,
        }
    }

    pub async fn fetch(&mut self) -> Outcome<Vec<Activity>> {
        self.error = None;
        let result = self.client.fetch_activities().await;
        self.loading = false;
        self.refreshing = false;

        match result {
            Ok(activities) => {
                self.activities = activities.clone();
                Outcome::ok(activities)
            }
            Err(e) => {
                tracing::error!("❌ Erro ao carregar atividades: {}", e);
                let message = e.to_string();
                self.error = Some(message.clone());
                Outcome::err(message)
            }
        }
    }

    pub async fn refresh(&mut self) -> Outcome<Vec<Activity>> {
        self.refreshing = true;
        self.fetch().await
    }
}
