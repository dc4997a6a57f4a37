//! Share notification delivery seam.

pub mod sender;

pub use sender::{LogNotificationSender, NotificationSender, ShareNotification};
