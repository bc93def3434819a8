// Backend-agnostic integration tests for the Database trait.
//
// Each public async function accepts `&dyn Database` so that the same logic
// can be exercised against both the SQLite and Postgres backends.

use folio_core::contact::CreateContact;
use folio_core::project::{Category, CreateProject, UpdateProject};
use folio_db::{Database, DbError};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const MISSING_ID: &str = "1b4e28ba-2fa1-11d2-883f-0016d3cca427";

fn make_contact(name: &str) -> CreateContact {
    CreateContact {
        name: name.to_string(),
        email: "visitor@example.com".into(),
        subject: "Hello".into(),
        message: "I liked your work".into(),
        image_path: None,
    }
}

fn make_project(title: &str) -> CreateProject {
    CreateProject {
        title: title.to_string(),
        description: "B".into(),
        image_url: "http://x/i.png".into(),
        technologies: vec!["react".into()],
        category: Category::Frontend,
        live_url: "http://x".into(),
        github_url: "http://g".into(),
    }
}

// ---------------------------------------------------------------------------
// Contact tests
// ---------------------------------------------------------------------------

/// Contacts get an id and timestamp and come back newest first.
pub async fn test_contact_lifecycle(db: &dyn Database) {
    let older = db.create_contact(&make_contact("older")).await.unwrap();
    let mut with_image = make_contact("newer");
    with_image.image_path = Some("/uploads/1700000000000-cat.png".into());
    let newer = db.create_contact(&with_image).await.unwrap();

    assert!(!older.id.is_empty());
    assert!(older.image_path.is_none());
    assert_eq!(
        newer.image_path.as_deref(),
        Some("/uploads/1700000000000-cat.png")
    );
    assert!(newer.created_at >= older.created_at);

    let all = db.list_contacts().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, newer.id);
    assert_eq!(all[1].id, older.id);
}

// ---------------------------------------------------------------------------
// Project tests
// ---------------------------------------------------------------------------

/// Create, get, list, update, delete.
pub async fn test_project_crud(db: &dyn Database) {
    let p = db.create_project(&make_project("A")).await.unwrap();
    assert_eq!(p.title, "A");
    assert_eq!(p.technologies, vec!["react"]);

    let fetched = db.get_project(&p.id).await.unwrap();
    assert_eq!(fetched.id, p.id);
    assert_eq!(fetched.title, p.title);
    assert_eq!(fetched.description, p.description);
    assert_eq!(fetched.image_url, p.image_url);
    assert_eq!(fetched.technologies, p.technologies);
    assert_eq!(fetched.category, p.category);
    assert_eq!(fetched.live_url, p.live_url);
    assert_eq!(fetched.github_url, p.github_url);

    let updated = db
        .update_project(
            &p.id,
            &UpdateProject {
                category: Some(Category::Fullstack),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.category, Category::Fullstack);
    assert_eq!(updated.title, "A");
    assert_eq!(updated.technologies, vec!["react"]);

    db.delete_project(&p.id).await.unwrap();
    assert!(matches!(
        db.get_project(&p.id).await,
        Err(DbError::NotFound(_))
    ));
    assert!(db.list_projects().await.unwrap().is_empty());
}

/// Newest first.
pub async fn test_project_ordering(db: &dyn Database) {
    for title in ["first", "second", "third"] {
        db.create_project(&make_project(title)).await.unwrap();
    }
    let titles: Vec<String> = db
        .list_projects()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.title)
        .collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
}

/// Every field can be patched independently; untouched fields survive.
pub async fn test_project_sparse_update(db: &dyn Database) {
    let p = db.create_project(&make_project("A")).await.unwrap();

    let same = db
        .update_project(&p.id, &UpdateProject::default())
        .await
        .unwrap();
    assert_eq!(same.title, p.title);
    assert_eq!(same.category, p.category);
    assert_eq!(same.technologies, p.technologies);

    let patched = db
        .update_project(
            &p.id,
            &UpdateProject {
                title: Some("Renamed".into()),
                description: Some("New description".into()),
                image_url: Some("http://y/i.png".into()),
                technologies: Some(vec!["rust".into(), "axum".into()]),
                category: Some(Category::Backend),
                live_url: Some("http://y".into()),
                github_url: Some("http://h".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(patched.id, p.id);
    assert_eq!(patched.title, "Renamed");
    assert_eq!(patched.description, "New description");
    assert_eq!(patched.image_url, "http://y/i.png");
    assert_eq!(patched.technologies, vec!["rust", "axum"]);
    assert_eq!(patched.category, Category::Backend);
    assert_eq!(patched.live_url, "http://y");
    assert_eq!(patched.github_url, "http://h");
    assert_eq!(patched.created_at, same.created_at);
}

/// get/update/delete on an absent id are NotFound, never Internal.
pub async fn test_project_not_found(db: &dyn Database) {
    assert!(matches!(
        db.get_project(MISSING_ID).await,
        Err(DbError::NotFound(_))
    ));
    assert!(matches!(
        db.update_project(MISSING_ID, &UpdateProject::default()).await,
        Err(DbError::NotFound(_))
    ));
    assert!(matches!(
        db.update_project(
            MISSING_ID,
            &UpdateProject {
                title: Some("x".into()),
                ..Default::default()
            }
        )
        .await,
        Err(DbError::NotFound(_))
    ));
    assert!(matches!(
        db.delete_project(MISSING_ID).await,
        Err(DbError::NotFound(_))
    ));
}
