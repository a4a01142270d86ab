use chrono::Utc;
use diesel::prelude::*;
use diesel::upsert::excluded;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::ReviewRepository;
use crate::domain::review::{ReviewInput, ReviewView};
use crate::schema::reviews;

use super::models::{NewReviewRow, ReviewRow};

pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ReviewRepository for DieselReviewRepository {
    fn upsert(
        &self,
        user_id: i32,
        product_id: i32,
        review: ReviewInput,
    ) -> Result<ReviewView, DomainError> {
        let mut conn = self.pool.get()?;

        diesel::insert_into(reviews::table)
            .values(&NewReviewRow {
                user_id,
                product_id,
                rating: review.rating,
                comment: &review.comment,
                updated_at: Utc::now(),
            })
            .on_conflict((reviews::user_id, reviews::product_id))
            .do_update()
            .set((
                reviews::rating.eq(excluded(reviews::rating)),
                reviews::comment.eq(excluded(reviews::comment)),
                reviews::updated_at.eq(excluded(reviews::updated_at)),
            ))
            .returning(ReviewRow::as_returning())
            .get_result::<ReviewRow>(&mut conn)
            .map(ReviewView::from)
            .map_err(|e| {
                if super::is_foreign_key_violation(&e) {
                    DomainError::not_found(format!("Product {product_id}"))
                } else {
                    e.into()
                }
            })
    }

    fn list_for_product(&self, product_id: i32) -> Result<Vec<ReviewView>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = reviews::table
            .filter(reviews::product_id.eq(product_id))
            .order((reviews::updated_at.desc(), reviews::id.desc()))
            .select(ReviewRow::as_select())
            .load::<ReviewRow>(&mut conn)?;
        Ok(rows.into_iter().map(ReviewView::from).collect())
    }
}
