//! The fixed feed. There is no write path.

use crate::models::Post;

pub fn posts() -> Vec<Post> {
    vec![
        Post {
            id: 1,
            user_id: 2,
            username: "Sarah Johnson".to_string(),
            profile_image: "https://i.pravatar.cc/48?img=33".to_string(),
            content: "Just got back from an amazing vacation! The views were incredible! \
                      🏖️ #vacation #summer"
                .to_string(),
            image_url: Some(
                "https://images.unsplash.com/photo-1507525428034-b723cf961d3e".to_string(),
            ),
            created_at: "3 hours ago".to_string(),
            likes: 124,
            comments: 45,
            shares: 3,
        },
        Post {
            id: 2,
            user_id: 3,
            username: "Michael Chen".to_string(),
            profile_image: "https://i.pravatar.cc/48?img=59".to_string(),
            content: "Just finished this amazing book! Highly recommend to anyone interested \
                      in technology and AI."
                .to_string(),
            image_url: None,
            created_at: "Yesterday at 10:43 AM".to_string(),
            likes: 98,
            comments: 23,
            shares: 5,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_has_two_posts_in_order() {
        let posts = posts();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, 1);
        assert_eq!(posts[1].id, 2);
        assert!(posts[0].image_url.is_some());
        assert!(posts[1].image_url.is_none());
    }

    #[test]
    fn feed_is_identical_across_calls() {
        assert_eq!(posts(), posts());
    }

    #[test]
    fn content_continuation_keeps_single_spaces() {
        let posts = posts();
        assert!(posts[0].content.contains("incredible! 🏖️ #vacation"));
        assert!(posts[1].content.contains("interested in technology"));
    }
}
