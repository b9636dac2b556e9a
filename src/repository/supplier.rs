use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::supplier::{
    NewSupplier as DomainNewSupplier, Supplier as DomainSupplier, SupplierListQuery,
};
use crate::models::supplier::{NewSupplier as DbNewSupplier, Supplier as DbSupplier};
use crate::repository::{DieselRepository, SupplierReader, SupplierWriter};

impl SupplierReader for DieselRepository {
    fn get_supplier_by_id(&self, id: &str) -> RepositoryResult<Option<DomainSupplier>> {
        use crate::schema::suppliers;

        let mut conn = self.conn()?;
        let supplier = suppliers::table
            .filter(suppliers::id.eq(id))
            .first::<DbSupplier>(&mut conn)
            .optional()?;

        Ok(supplier.map(Into::into))
    }

    fn list_suppliers(
        &self,
        query: SupplierListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainSupplier>)> {
        use crate::schema::suppliers;

        let mut conn = self.conn()?;

        let mut count_query = suppliers::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            count_query = count_query.filter(
                suppliers::name
                    .like(pattern.clone())
                    .or(suppliers::email.like(pattern)),
            );
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = suppliers::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            items = items.filter(
                suppliers::name
                    .like(pattern.clone())
                    .or(suppliers::email.like(pattern)),
            );
        }

        items = items.order((suppliers::name.asc(), suppliers::id.asc()));

        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let db_suppliers = items.load::<DbSupplier>(&mut conn)?;

        Ok((total, db_suppliers.into_iter().map(Into::into).collect()))
    }
}

impl SupplierWriter for DieselRepository {
    fn create_supplier_if_missing(&self, new_supplier: &DomainNewSupplier) -> RepositoryResult<bool> {
        use crate::schema::suppliers;

        let mut conn = self.conn()?;
        let db_new = DbNewSupplier::from(new_supplier);

        let inserted = diesel::insert_into(suppliers::table)
            .values(&db_new)
            .on_conflict_do_nothing()
            .execute(&mut conn)?;

        Ok(inserted > 0)
    }

    fn create_suppliers_if_missing(
        &self,
        new_suppliers: &[DomainNewSupplier],
    ) -> RepositoryResult<usize> {
        use crate::schema::suppliers;

        let mut conn = self.conn()?;

        let mut created = 0usize;
        for new_supplier in new_suppliers {
            let db_new = DbNewSupplier::from(new_supplier);
            created += diesel::insert_into(suppliers::table)
                .values(&db_new)
                .on_conflict_do_nothing()
                .execute(&mut conn)?;
        }

        Ok(created)
    }
}
