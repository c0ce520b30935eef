//! Per-user view/download tallies and their aggregates.
//!
//! A counter is one mutable row per (content, user): recording again
//! increments click_count in place, so totals are SUM(click_count) across
//! users rather than a row count.

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QuerySelect,
};

use crate::entity::{pdf_download, prelude::*, video_view};
use crate::error::ApiError;

pub async fn record_view<C: ConnectionTrait>(
    conn: &C,
    content_id: i32,
    user_id: i32,
) -> Result<(), ApiError> {
    let existing = VideoView::find()
        .filter(video_view::Column::VideoId.eq(content_id))
        .filter(video_view::Column::UserId.eq(user_id))
        .one(conn)
        .await?;

    match existing {
        Some(row) => {
            let next = row.click_count + 1;
            let mut active: video_view::ActiveModel = row.into();
            active.click_count = Set(next);
            active.update(conn).await?;
        }
        None => {
            video_view::ActiveModel {
                video_id: Set(content_id),
                user_id: Set(user_id),
                click_count: Set(1),
                ..Default::default()
            }
            .insert(conn)
            .await?;
        }
    }

    Ok(())
}

pub async fn record_download<C: ConnectionTrait>(
    conn: &C,
    content_id: i32,
    user_id: i32,
) -> Result<(), ApiError> {
    let existing = PdfDownload::find()
        .filter(pdf_download::Column::ContentId.eq(content_id))
        .filter(pdf_download::Column::UserId.eq(user_id))
        .one(conn)
        .await?;

    match existing {
        Some(row) => {
            let next = row.click_count + 1;
            let mut active: pdf_download::ActiveModel = row.into();
            active.click_count = Set(next);
            active.update(conn).await?;
        }
        None => {
            pdf_download::ActiveModel {
                content_id: Set(content_id),
                user_id: Set(user_id),
                click_count: Set(1),
                ..Default::default()
            }
            .insert(conn)
            .await?;
        }
    }

    Ok(())
}

pub async fn total_views<C: ConnectionTrait>(conn: &C, content_id: i32) -> Result<i64, ApiError> {
    let total: Option<Option<i64>> = VideoView::find()
        .select_only()
        .column_as(video_view::Column::ClickCount.sum(), "total")
        .filter(video_view::Column::VideoId.eq(content_id))
        .into_tuple()
        .one(conn)
        .await?;
    Ok(total.flatten().unwrap_or(0))
}

pub async fn total_downloads<C: ConnectionTrait>(
    conn: &C,
    content_id: i32,
) -> Result<i64, ApiError> {
    let total: Option<Option<i64>> = PdfDownload::find()
        .select_only()
        .column_as(pdf_download::Column::ClickCount.sum(), "total")
        .filter(pdf_download::Column::ContentId.eq(content_id))
        .into_tuple()
        .one(conn)
        .await?;
    Ok(total.flatten().unwrap_or(0))
}

/// One grouped SUM over the page's id set; avoids a query per row.
pub async fn view_totals<C: ConnectionTrait>(
    conn: &C,
    content_ids: &[i32],
) -> Result<HashMap<i32, i64>, ApiError> {
    if content_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(i32, Option<i64>)> = VideoView::find()
        .select_only()
        .column(video_view::Column::VideoId)
        .column_as(video_view::Column::ClickCount.sum(), "total")
        .filter(video_view::Column::VideoId.is_in(content_ids.iter().copied()))
        .group_by(video_view::Column::VideoId)
        .into_tuple()
        .all(conn)
        .await?;
    Ok(rows
        .into_iter()
        .map(|(id, total)| (id, total.unwrap_or(0)))
        .collect())
}

pub async fn download_totals<C: ConnectionTrait>(
    conn: &C,
    content_ids: &[i32],
) -> Result<HashMap<i32, i64>, ApiError> {
    if content_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(i32, Option<i64>)> = PdfDownload::find()
        .select_only()
        .column(pdf_download::Column::ContentId)
        .column_as(pdf_download::Column::ClickCount.sum(), "total")
        .filter(pdf_download::Column::ContentId.is_in(content_ids.iter().copied()))
        .group_by(pdf_download::Column::ContentId)
        .into_tuple()
        .all(conn)
        .await?;
    Ok(rows
        .into_iter()
        .map(|(id, total)| (id, total.unwrap_or(0)))
        .collect())
}
