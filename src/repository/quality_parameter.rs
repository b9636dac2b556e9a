use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::quality_parameter::{
    NewQualityParameter as DomainNewQualityParameter, QualityParameter as DomainQualityParameter,
    QualityParameterListQuery, UpdateQualityParameter as DomainUpdateQualityParameter,
};
use crate::models::quality_parameter::{
    NewQualityParameter as DbNewQualityParameter, QualityParameter as DbQualityParameter,
    UpdateQualityParameter as DbUpdateQualityParameter,
};
use crate::repository::{DieselRepository, QualityParameterReader, QualityParameterWriter};

impl QualityParameterReader for DieselRepository {
    fn get_quality_parameter_by_id(
        &self,
        id: i32,
    ) -> RepositoryResult<Option<DomainQualityParameter>> {
        use crate::schema::quality_parameters;

        let mut conn = self.conn()?;
        let parameter = quality_parameters::table
            .filter(quality_parameters::id.eq(id))
            .first::<DbQualityParameter>(&mut conn)
            .optional()?;

        Ok(parameter.map(Into::into))
    }

    fn list_quality_parameters(
        &self,
        query: QualityParameterListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainQualityParameter>)> {
        use crate::schema::quality_parameters;

        let mut conn = self.conn()?;

        let mut count_query = quality_parameters::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(search) = query.search.as_ref() {
            let pattern = format!("%{}%", search);
            count_query = count_query.filter(quality_parameters::name.like(pattern));
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items_query = quality_parameters::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(search) = query.search.as_ref() {
            let pattern = format!("%{}%", search);
            items_query = items_query.filter(quality_parameters::name.like(pattern));
        }

        items_query = items_query.order((quality_parameters::name.asc(), quality_parameters::id.asc()));

        if let Some(pagination) = &query.pagination {
            let page = pagination.page.max(1);
            let per_page = pagination.per_page as i64;
            let offset = ((page - 1) * pagination.per_page) as i64;
            items_query = items_query.offset(offset).limit(per_page);
        }

        let db_parameters = items_query.load::<DbQualityParameter>(&mut conn)?;
        let parameters = db_parameters
            .into_iter()
            .map(DomainQualityParameter::from)
            .collect();

        Ok((total, parameters))
    }
}

impl QualityParameterWriter for DieselRepository {
    fn create_quality_parameter(
        &self,
        new_parameter: &DomainNewQualityParameter,
    ) -> RepositoryResult<DomainQualityParameter> {
        use crate::schema::quality_parameters;

        let mut conn = self.conn()?;
        let insertable = DbNewQualityParameter::from(new_parameter);

        let created = diesel::insert_into(quality_parameters::table)
            .values(&insertable)
            .get_result::<DbQualityParameter>(&mut conn)?;

        Ok(created.into())
    }

    fn update_quality_parameter(
        &self,
        parameter_id: i32,
        updates: &DomainUpdateQualityParameter,
    ) -> RepositoryResult<DomainQualityParameter> {
        use crate::schema::quality_parameters;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateQualityParameter::from(updates);

        let target = quality_parameters::table.filter(quality_parameters::id.eq(parameter_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbQualityParameter>(&mut conn)?;

        Ok(updated.into())
    }
}
