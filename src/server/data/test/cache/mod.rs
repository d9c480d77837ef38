use crate::server::{
    data::cache::CacheRepository, error::AppError, model::cache::UpsertCacheEntryParam,
};
use chrono::{TimeDelta, Utc};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use test_utils::{builder::TestBuilder, factory::cache_entry::CacheEntryFactory};

mod delete;
mod get;
mod upsert;
