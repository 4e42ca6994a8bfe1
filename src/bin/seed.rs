//! Database seed script for loading sample dashboard content
//! Run with: cargo run --bin seed

use serde_json::json;
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE__URL")
        .unwrap_or_else(|_| "postgres://localhost/kidzone_admin".to_string());

    println!("Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await?;

    println!("Connected successfully!");

    sqlx::migrate!("./migrations").run(&pool).await?;

    let stories = [
        json!({
            "title": "The Lion and the Mouse",
            "link": "https://example.com/story1",
            "ageGroup": "3-6",
            "coverUrl": "https://placehold.co/400x300/png?text=Story",
            "isCodeStory": false,
            "isTemporary": false,
        }),
        json!({
            "title": "Clever Rabbit",
            "link": "https://example.com/story2",
            "ageGroup": "6-9",
            "coverUrl": "https://placehold.co/400x300/png?text=Story",
            "isCodeStory": false,
            "isTemporary": false,
        }),
    ];

    let videos = [
        json!({
            "title": "ABC Song",
            "description": "Sing along with the alphabet.",
            "videoUrl": "https://example.com/video1",
            "thumbnailUrl": "https://via.placeholder.com/640x360?text=Video+Thumbnail",
            "ageGroup": "0-3",
        }),
        json!({
            "title": "Counting Numbers",
            "description": "Learn to count from one to ten.",
            "videoUrl": "https://example.com/video2",
            "thumbnailUrl": "https://via.placeholder.com/640x360?text=Video+Thumbnail",
            "ageGroup": "3-6",
        }),
    ];

    println!("Seeding stories...");
    for story in &stories {
        sqlx::query("INSERT INTO documents (collection, data) VALUES ('stories', $1)")
            .bind(story)
            .execute(&pool)
            .await?;
    }

    println!("Seeding videos...");
    for video in &videos {
        sqlx::query("INSERT INTO documents (collection, data) VALUES ('videos', $1)")
            .bind(video)
            .execute(&pool)
            .await?;
    }

    println!("\n========================================");
    println!("Sample Content Ready!");
    println!("========================================");
    println!("Stories: {}", stories.len());
    println!("Videos:  {}", videos.len());

    Ok(())
}
