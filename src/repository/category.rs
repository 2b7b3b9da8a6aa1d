use std::collections::HashMap;

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::BigInt;

use crate::domain::category::{Category, CategoryUpdate, NewCategory};
use crate::domain::types::{CategoryId, SubcategoryName};
use crate::models::category::{
    Category as DbCategory, NewCategory as DbNewCategory, NewSubcategory, Subcategory,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{CategoryReader, CategoryWriter, DieselRepository};

fn load_subcategories(
    conn: &mut SqliteConnection,
    category_ids: Vec<&str>,
) -> QueryResult<HashMap<String, Vec<Subcategory>>> {
    use crate::schema::category_subcategories;

    let rows = category_subcategories::table
        .filter(category_subcategories::category_id.eq_any(category_ids))
        .order((
            category_subcategories::position.asc(),
            category_subcategories::id.asc(),
        ))
        .load::<Subcategory>(conn)?;

    let mut grouped: HashMap<String, Vec<Subcategory>> = HashMap::new();
    for row in rows {
        grouped.entry(row.category_id.clone()).or_default().push(row);
    }
    Ok(grouped)
}

fn insert_subcategories(
    conn: &mut SqliteConnection,
    category_id: &str,
    subcategories: &[SubcategoryName],
) -> QueryResult<usize> {
    use crate::schema::category_subcategories;

    let rows: Vec<NewSubcategory<'_>> = subcategories
        .iter()
        .zip(0..)
        .map(|(name, position)| NewSubcategory {
            category_id,
            position,
            name: name.as_str(),
        })
        .collect();

    if rows.is_empty() {
        return Ok(0);
    }

    diesel::insert_into(category_subcategories::table)
        .values(&rows)
        .execute(conn)
}

impl CategoryReader for DieselRepository {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let rows = categories::table
            .order(sql::<BigInt>("rowid"))
            .load::<DbCategory>(&mut conn)?;

        let ids: Vec<&str> = rows.iter().map(|row| row.id.as_str()).collect();
        let mut subcategories = load_subcategories(&mut conn, ids)?;

        let items = rows
            .into_iter()
            .map(|row| {
                let subs = subcategories.remove(&row.id).unwrap_or_default();
                row.into_domain(subs)
            })
            .collect::<Result<Vec<Category>, _>>()?;

        Ok(items)
    }

    fn get_category_by_id(&self, id: &CategoryId) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let row = categories::table
            .find(id.as_str())
            .first::<DbCategory>(&mut conn)
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut subcategories = load_subcategories(&mut conn, vec![id.as_str()])?;
        let subs = subcategories.remove(id.as_str()).unwrap_or_default();
        Ok(Some(row.into_domain(subs)?))
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let id = CategoryId::generate();

        conn.transaction(|conn| {
            diesel::insert_into(categories::table)
                .values(DbNewCategory {
                    id: id.as_str(),
                    name: category.name.as_str(),
                    icon_url: category.icon_url.as_ref().map(|u| u.as_str()),
                    created_at: category.created_at,
                })
                .execute(conn)?;
            insert_subcategories(conn, id.as_str(), &category.subcategories)
        })?;

        Ok(Category {
            id,
            name: category.name.clone(),
            subcategories: category.subcategories.clone(),
            icon_url: category.icon_url.clone(),
            created_at: category.created_at,
        })
    }

    fn update_category(
        &self,
        id: &CategoryId,
        update: &CategoryUpdate,
    ) -> RepositoryResult<usize> {
        use crate::schema::{categories, category_subcategories};

        let mut conn = self.conn()?;

        let affected = conn.transaction(|conn| {
            let affected = diesel::update(categories::table.find(id.as_str()))
                .set((
                    categories::name.eq(update.name.as_str()),
                    categories::icon_url.eq(update.icon_url.as_ref().map(|u| u.as_str())),
                ))
                .execute(conn)?;
            if affected == 0 {
                return Ok::<usize, diesel::result::Error>(0);
            }

            diesel::delete(
                category_subcategories::table
                    .filter(category_subcategories::category_id.eq(id.as_str())),
            )
            .execute(conn)?;
            insert_subcategories(conn, id.as_str(), &update.subcategories)?;

            Ok(affected)
        })?;

        Ok(affected)
    }

    fn delete_category(&self, id: &CategoryId) -> RepositoryResult<usize> {
        use crate::schema::{categories, category_subcategories};

        let mut conn = self.conn()?;

        let affected = conn.transaction(|conn| {
            diesel::delete(
                category_subcategories::table
                    .filter(category_subcategories::category_id.eq(id.as_str())),
            )
            .execute(conn)?;

            diesel::delete(categories::table.find(id.as_str())).execute(conn)
        })?;

        Ok(affected)
    }
}
