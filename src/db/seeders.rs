//! Database seeders for built-in data.

use anyhow::Result;
use tracing::info;

use super::{books, Book, DbPool};

/// Seed the catalog with the sample books, only when the table is empty.
pub async fn seed_books(pool: &DbPool) -> Result<()> {
    let count = books::count(pool).await?;
    if count > 0 {
        info!("Catalog already contains {} books, skipping seed", count);
        return Ok(());
    }

    info!("Empty catalog, seeding sample books...");

    let samples = vec![
        Book::new(
            "978-0143034638",
            "The White Tiger",
            "Aravind Adiga",
            Some(
                "A satirical novel about the class struggle in modern India as told through \
                 the life of a highly ambitious man who escapes his village and achieves success."
                    .to_string(),
            ),
        ),
        Book::new(
            "978-0679727761",
            "The God of Small Things",
            "Arundhati Roy",
            Some(
                "A novel exploring the childhood experiences of fraternal twins whose lives \
                 are destroyed by the 'Love Laws' of 1969 Kerala, India."
                    .to_string(),
            ),
        ),
        Book::new(
            "978-0385370500",
            "The Namesake",
            "Jhumpa Lahiri",
            Some(
                "The story of Gogol Ganguli, a boy born in America to Bengali parents, and \
                 his struggle with his unique name and the clashing cultures in his life."
                    .to_string(),
            ),
        ),
        Book::new(
            "978-0143420842",
            "Malgudi Days",
            "R. K. Narayan",
            Some(
                "A collection of short stories depicting the lives of people living in the \
                 fictional town of Malgudi, capturing the essence of Indian life with gentle humor."
                    .to_string(),
            ),
        ),
    ];

    let seeded = samples.len();
    for book in &samples {
        books::insert(pool, book).await?;
    }

    info!("{} books added to the catalog", seeded);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let pool = test_pool().await;

        seed_books(&pool).await.unwrap();
        assert_eq!(books::count(&pool).await.unwrap(), 4);

        // Second run must not duplicate
        seed_books(&pool).await.unwrap();
        assert_eq!(books::count(&pool).await.unwrap(), 4);
    }
}
