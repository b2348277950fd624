//! Best-effort admin notification after a successful registration.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use telegram_client::{TelegramClient, TelegramError};
use tracing::info;

use crate::store::Client;

/// Outbound notification seam.
///
/// Implementations surface only their channel's own error type. Callers
/// run notifications strictly after commit, log failures and never let
/// them affect the registration outcome.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Announce a freshly created client.
    async fn client_registered(&self, client: &Client) -> Result<(), TelegramError>;

    /// Probe the underlying channel.
    async fn health_check(&self) -> bool;
}

/// Sends an HTML summary of each new client to the admin chat.
pub struct AdminNotifier {
    bot: TelegramClient,
    admin_chat_id: i64,
    display_offset: FixedOffset,
}

impl AdminNotifier {
    pub fn new(bot: TelegramClient, admin_chat_id: i64, display_offset: FixedOffset) -> Self {
        Self {
            bot,
            admin_chat_id,
            display_offset,
        }
    }

    fn summary(&self, client: &Client) -> String {
        let (date, time) = split_local(client.created_at, self.display_offset);
        format!(
            "<b>🆔 UID:</b> {}\n<b>☎️ Phone:</b> {}\n<b>📅 Date:</b> {}\n<b>⏳ Time:</b> {}",
            client.id, client.phone_number, date, time
        )
    }
}

#[async_trait]
impl Notifier for AdminNotifier {
    async fn client_registered(&self, client: &Client) -> Result<(), TelegramError> {
        self.bot
            .send_message(self.admin_chat_id, &self.summary(client))
            .await?;

        info!(phone_number = %client.phone_number, "Admin notified about the new client");
        Ok(())
    }

    async fn health_check(&self) -> bool {
        self.bot.health_check().await
    }
}

/// Shift a stored UTC timestamp by the fixed display offset and split it
/// into user-facing date and time strings. The offset is a plain hour
/// shift; there is no DST handling.
fn split_local(ts: DateTime<Utc>, offset: FixedOffset) -> (String, String) {
    let local = ts.with_timezone(&offset);
    (
        local.format("%d.%m.%Y").to_string(),
        local.format("%H:%M:%S").to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn offset(hours: i32) -> FixedOffset {
        FixedOffset::east_opt(hours * 3600).unwrap()
    }

    #[test]
    fn test_split_local_applies_fixed_offset() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 22, 30, 15).unwrap();

        let (date, time) = split_local(ts, offset(4));
        assert_eq!(date, "02.01.2024");
        assert_eq!(time, "02:30:15");

        let (date, time) = split_local(ts, offset(0));
        assert_eq!(date, "01.01.2024");
        assert_eq!(time, "22:30:15");
    }

    #[test]
    fn test_summary_names_client_fields() {
        let bot = TelegramClient::new(
            "test-token",
            telegram_client::DEFAULT_API_URL,
            std::time::Duration::from_secs(1),
        )
        .unwrap();
        let notifier = AdminNotifier::new(bot, 1, offset(4));

        let client = Client {
            id: 42,
            phone_number: "+79123456789".into(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 22, 30, 15).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 22, 30, 15).unwrap(),
        };

        let text = notifier.summary(&client);
        assert!(text.contains("42"));
        assert!(text.contains("+79123456789"));
        assert!(text.contains("02.01.2024"));
        assert!(text.contains("02:30:15"));
    }
}
