//! `tally attendance` — submit, show, history.

use chrono::Utc;

use tally_config::TallyConfig;
use tally_core::entities::ClassSession;
use tally_core::repository::AttendanceRepository;
use tally_core::responses::{
    AttendanceHistoryResponse, AttendanceShowResponse, AttendanceSubmitResponse,
};
use tally_db::service::LedgerService;

use crate::cli::{AttendanceAction, AttendanceSubmitArgs};
use crate::output::print_json;

pub async fn handle(
    action: &AttendanceAction,
    service: &LedgerService,
    config: &TallyConfig,
) -> anyhow::Result<()> {
    match action {
        AttendanceAction::Submit(args) => submit(args, service).await,
        AttendanceAction::Show(args) => {
            let record = service.get_attendance(&args.key.to_key()).await?;
            print_json(&AttendanceShowResponse { record })
        }
        AttendanceAction::History(args) => {
            let mut entries = service.attendance_history(&args.key.to_key()).await?;
            let limit = args.limit.unwrap_or(config.general.history_limit);
            entries.truncate(limit as usize);
            print_json(&AttendanceHistoryResponse { entries })
        }
    }
}

async fn submit(args: &AttendanceSubmitArgs, service: &LedgerService) -> anyhow::Result<()> {
    let key = args.key.to_key();
    let session = ClassSession {
        id: args.key.session_id.clone(),
        modality: None,
        starts_at: args.session.starts_at,
        ends_at: args.session.ends_at,
        duration_minutes: args.session.duration_minutes,
    };

    let record = service
        .submit_attendance(
            &key,
            &session,
            &args.actor.to_actor(),
            args.status,
            args.justification.as_deref(),
            args.override_reason.as_deref(),
            Utc::now(),
        )
        .await?;
    print_json(&AttendanceSubmitResponse { record })
}
