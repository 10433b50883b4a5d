//! Server-rendered page shell: the login/register view for anonymous
//! visitors, the feed view for signed-in users.

use askama::Template;

use crate::auth::validation::MIN_PASSWORD_LEN;
use crate::feed;
use crate::models::{Post, PublicUser};

#[derive(Template)]
#[template(path = "pages/login.html")]
pub struct LoginTemplate {
    pub min_password_len: usize,
}

#[derive(Template)]
#[template(path = "pages/feed.html")]
pub struct FeedTemplate {
    pub user: PublicUser,
    pub display_name: String,
    pub initial: String,
    pub posts: Vec<Post>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShellView {
    Anonymous,
    Authenticated { user: PublicUser, posts: Vec<Post> },
}

impl ShellView {
    pub fn for_session(user: Option<PublicUser>) -> Self {
        match user {
            Some(user) => ShellView::Authenticated {
                user,
                posts: feed::posts(),
            },
            None => ShellView::Anonymous,
        }
    }

    pub fn render(self) -> askama::Result<String> {
        match self {
            ShellView::Anonymous => LoginTemplate {
                min_password_len: MIN_PASSWORD_LEN,
            }
            .render(),
            ShellView::Authenticated { user, posts } => FeedTemplate {
                display_name: user.display_name(),
                initial: user.initial(),
                user,
                posts,
            }
            .render(),
        }
    }
}
