//! Built-in poster notifiers.

use super::{NotifyResult, Observer};
use crate::model::poster::Poster;
use log::info;

/// Announces poster changes by (simulated) email.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmailNotifier;

/// Announces poster changes by (simulated) SMS.
#[derive(Debug, Default, Clone, Copy)]
pub struct SmsNotifier;

impl Observer<Poster> for EmailNotifier {
    fn update(&self, poster: &Poster) -> NotifyResult<()> {
        announce("email", poster);
        Ok(())
    }
}

impl Observer<Poster> for SmsNotifier {
    fn update(&self, poster: &Poster) -> NotifyResult<()> {
        announce("sms", poster);
        Ok(())
    }
}

fn announce(channel: &str, poster: &Poster) {
    let newest = poster
        .persons()
        .last()
        .map_or_else(String::new, |person| person.borrow().name.clone());
    info!(
        "event=poster_notify module=observer status=ok channel={channel} poster={} persons={} newest={newest}",
        poster.name,
        poster.persons().len()
    );
}
