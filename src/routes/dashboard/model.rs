use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::routes::book::Book;
use crate::routes::user::User;

/// Records taken from the head of each collection.
const RECENT_PER_KIND: usize = 3;
const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    User,
    Book,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub message: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub user_count: usize,
    pub book_count: usize,
    pub recent_activities: Vec<Activity>,
}

impl DashboardSummary {
    pub fn build(users: &[User], books: &[Book]) -> Self {
        Self {
            user_count: users.len(),
            book_count: books.len(),
            recent_activities: recent_activities(users, books),
        }
    }
}

/// Labels the first few users and books, newest first. Ties keep users
/// ahead of books and store order within each kind.
pub fn recent_activities(users: &[User], books: &[Book]) -> Vec<Activity> {
    let user_activity = users.iter().take(RECENT_PER_KIND).map(|user| Activity {
        kind: ActivityKind::User,
        message: format!("New user registered: {}", user.username),
        date: user.created_at,
    });
    let book_activity = books.iter().take(RECENT_PER_KIND).map(|book| Activity {
        kind: ActivityKind::Book,
        message: format!("New book added: {}", book.book_name),
        date: book.created_at,
    });

    let mut activities: Vec<Activity> = user_activity.chain(book_activity).collect();
    // stable
    activities.sort_by(|a, b| b.date.cmp(&a.date));
    activities.truncate(RECENT_LIMIT);
    activities
}
