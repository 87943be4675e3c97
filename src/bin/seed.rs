use aurapass::{
    config::Settings,
    domain::{CreateAnnouncementRequest, CreateEventRequest, EventStatus},
    service::{bootstrap, ServiceContext},
};
use clap::Parser;
use fake::{
    faker::{lorem::en::Sentence, name::en::Name},
    Fake,
};
use sqlx::sqlite::SqlitePoolOptions;

const EVENT_TYPES: [&str; 4] = ["Technical", "Cultural", "Sports", "Workshop"];

/// Fill an Aurapass database with demo students, events and announcements.
#[derive(Parser, Debug)]
#[command(name = "seed")]
struct Args {
    /// Database to seed (defaults to the configured one)
    #[arg(long)]
    database_url: Option<String>,

    /// Number of students to create
    #[arg(long, default_value_t = 5)]
    students: usize,

    /// Number of events to create
    #[arg(long, default_value_t = 4)]
    events: usize,

    /// Number of announcements to post
    #[arg(long, default_value_t = 2)]
    announcements: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let settings = Settings::new().unwrap_or_default();
    let database_url = args.database_url
        .clone()
        .unwrap_or_else(|| settings.database.url.clone());

    println!("🌱 Seeding {}", database_url);

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    let context = ServiceContext::new(db_pool, &settings);
    bootstrap::ensure_default_accounts(context.user_repo.as_ref(), &settings.bootstrap).await?;

    println!("👥 Creating {} students...", args.students);
    for _ in 0..args.students {
        let name: String = Name().fake();
        let credential = context.user_service.create_student(Some(name.clone())).await?;
        println!("  ✅ {} / {} ({})", credential.gid, credential.password, name);
    }

    println!("📅 Creating {} events...", args.events);
    for i in 0..args.events {
        let description: String = Sentence(6..12).fake();
        let event = context.event_service.create(CreateEventRequest {
            name: format!("{} Meetup #{}", EVENT_TYPES[i % EVENT_TYPES.len()], i + 1),
            event_type: Some(EVENT_TYPES[i % EVENT_TYPES.len()].to_string()),
            start_date: Some((chrono::Utc::now() + chrono::Duration::days(7 * (i as i64 + 1)))
                .format("%Y-%m-%d")
                .to_string()),
            status: if i % 2 == 1 { EventStatus::Closed } else { EventStatus::Open },
            description: Some(description),
        }).await?;
        println!("  ✅ Event {} ({:?})", event.id, event.status);
    }

    println!("📢 Posting {} announcements...", args.announcements);
    for _ in 0..args.announcements {
        let title: String = Sentence(3..6).fake();
        let content: String = Sentence(10..20).fake();
        let announcement = context.announcement_service
            .create(CreateAnnouncementRequest { title, content })
            .await?;
        println!("  ✅ Announcement {}", announcement.id);
    }

    println!("🎉 Seeding complete");

    Ok(())
}
