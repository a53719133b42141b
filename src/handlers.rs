use crate::errors::AppError;
use crate::form::ControlId;
use crate::models::{ClickRequest, ClickResponse, FormSnapshot, ReportSummary, SubmitRequest};
use crate::report::Report;
use crate::state::AppState;
use crate::storage::persist_data;
use crate::ui::render_scout_page;
use axum::{
    extract::{Form as FormBody, Path, State},
    response::{Html, Redirect},
    Json,
};
use chrono::Local;
use tracing::{debug, info};

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let page = state.page.lock().await;
    Ok(Html(render_scout_page(&page.snapshot()?)))
}

pub async fn get_form(State(state): State<AppState>) -> Result<Json<FormSnapshot>, AppError> {
    let page = state.page.lock().await;
    Ok(Json(page.snapshot()?))
}

pub async fn click(
    State(state): State<AppState>,
    Json(payload): Json<ClickRequest>,
) -> Result<Json<ClickResponse>, AppError> {
    let mut page = state.page.lock().await;
    let outcome = page.click(payload.control)?;
    debug!(control = payload.control.0, ?outcome, "click handled");
    Ok(Json(ClickResponse {
        outcome,
        form: page.snapshot()?,
    }))
}

pub async fn click_control(
    State(state): State<AppState>,
    Path(control): Path<usize>,
) -> Result<Redirect, AppError> {
    let mut page = state.page.lock().await;
    let outcome = page.click(ControlId(control))?;
    debug!(control, ?outcome, "click handled");
    Ok(Redirect::to("/scout"))
}

pub async fn submit(
    State(state): State<AppState>,
    FormBody(payload): FormBody<SubmitRequest>,
) -> Result<Redirect, AppError> {
    let mut page = state.page.lock().await;
    let report = Report::from_submission(&payload, page.form()?, timestamp_string());

    let team = report.team_number.clone();
    let event = report.event.clone();
    let score = report.total_score();

    let mut data = state.data.lock().await;
    let mut updated = data.clone();
    updated.reports.push(report);
    persist_data(&state.data_path, &updated).await?;
    *data = updated;
    info!(%team, %event, score, "scouting report submitted");

    page.reload();
    Ok(Redirect::to("/scout"))
}

pub async fn get_reports(State(state): State<AppState>) -> Json<Vec<ReportSummary>> {
    let data = state.data.lock().await;
    Json(data.reports.iter().cloned().map(ReportSummary::from).collect())
}

fn timestamp_string() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppData;
    use crate::page::ScoutPage;

    fn first_success(page: &ScoutPage) -> ControlId {
        page.snapshot()
            .unwrap()
            .counters
            .iter()
            .find_map(|counter| counter.success.as_ref().filter(|control| !control.disabled))
            .map(|control| control.id)
            .expect("enabled success control")
    }

    #[tokio::test]
    async fn failed_save_keeps_reports_and_page_untouched() {
        let state = AppState::new(std::env::temp_dir(), AppData::default());
        {
            let mut page = state.page.lock().await;
            let control = first_success(&page);
            page.click(control).unwrap();
        }

        for _ in 0..2 {
            let result = submit(
                State(state.clone()),
                FormBody(SubmitRequest {
                    team_number: Some("111".into()),
                    ..SubmitRequest::default()
                }),
            )
            .await;
            assert!(result.is_err());
        }

        assert!(state.data.lock().await.reports.is_empty());
        let snapshot = state.page.lock().await.snapshot().unwrap();
        assert_eq!(snapshot.history_len, 1);
    }

    #[tokio::test]
    async fn successful_save_commits_report_and_reloads_page() {
        let mut path = std::env::temp_dir();
        path.push(format!("scout_counter_submit_{}.json", std::process::id()));
        let state = AppState::new(path.clone(), AppData::default());
        {
            let mut page = state.page.lock().await;
            let control = first_success(&page);
            page.click(control).unwrap();
        }

        let result = submit(State(state.clone()), FormBody(SubmitRequest::default())).await;
        assert!(result.is_ok());

        assert_eq!(state.data.lock().await.reports.len(), 1);
        let snapshot = state.page.lock().await.snapshot().unwrap();
        assert_eq!(snapshot.history_len, 0);
        let _ = tokio::fs::remove_file(&path).await;
    }
}
