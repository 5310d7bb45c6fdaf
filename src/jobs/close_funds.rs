use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info, warn};

use crate::database::connection::DbPool;
use crate::models::fund::{Fund, FundError};
use crate::models::user::User;
use crate::services::email::EmailService;

/// Closes finished fundraises on a fixed period and mails their organizers.
pub fn spawn(pool: DbPool, period: Duration, mailer: Option<Arc<EmailService>>) -> JoinHandle<()> {
    if mailer.is_none() {
        warn!("SMTP not configured, organizers will not be mailed when funds close");
    }

    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match run_once(&pool, mailer.clone()).await {
                Ok(0) => {}
                Ok(closed) => info!("Closed {} finished fundraises", closed),
                Err(e) => error!("Close-funds job failed: {}", e),
            }
        }
    })
}

pub async fn run_once(pool: &DbPool, mailer: Option<Arc<EmailService>>) -> Result<usize, FundError> {
    let closed = Fund::close_finished(pool, Utc::now()).await?;

    if let Some(mailer) = mailer {
        for fund in &closed {
            notify_organizer(pool, Arc::clone(&mailer), fund.clone()).await;
        }
    }

    Ok(closed.len())
}

async fn notify_organizer(pool: &DbPool, mailer: Arc<EmailService>, fund: Fund) {
    let organizer = match User::find_by_id(pool, fund.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!("Fund {} has no organizer account, skipping mail", fund.id);
            return;
        }
        Err(e) => {
            error!("Could not load organizer of fund {}: {}", fund.id, e);
            return;
        }
    };

    let fund_id = fund.id;
    let sent = tokio::task::spawn_blocking(move || {
        let template = mailer.fund_closed_template(&organizer.fullname, &fund);
        mailer.send_email(&organizer.email, Some(&organizer.fullname), template)
    })
    .await;

    match sent {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("Failed to mail organizer of fund {}: {}", fund_id, e),
        Err(e) => error!("Mail task for fund {} panicked: {}", fund_id, e),
    }
}
