//! `tally grade` — add, remove, total, history.

use chrono::Utc;

use tally_config::TallyConfig;
use tally_core::entities::NewContribution;
use tally_core::repository::GradeRepository;
use tally_core::responses::{
    GradeAddResponse, GradeHistoryResponse, GradeRemoveResponse, GradeTotalResponse,
};
use tally_db::service::LedgerService;

use crate::cli::GradeAction;
use crate::output::print_json;

pub async fn handle(
    action: &GradeAction,
    service: &LedgerService,
    config: &TallyConfig,
) -> anyhow::Result<()> {
    match action {
        GradeAction::Add(args) => {
            let key = args.key.to_key();
            let contribution = service
                .add_contribution(
                    &key,
                    NewContribution {
                        value: args.value,
                        source: args.source,
                        source_ref: args.source_ref.clone(),
                        source_title: args.source_title.clone(),
                        justification: args.justification.clone(),
                        manual: args.manual,
                    },
                    &args.actor.to_actor(),
                    Utc::now(),
                )
                .await?;
            let total = service.grade_total(&key).await?;
            let remaining = service.remaining_capacity(&key).await?;
            print_json(&GradeAddResponse {
                contribution,
                total,
                remaining,
            })
        }
        GradeAction::Remove(args) => {
            let key = args.key.to_key();
            service
                .remove_contribution(&key, &args.contribution, &args.actor.to_actor(), Utc::now())
                .await?;
            let total = service.grade_total(&key).await?;
            print_json(&GradeRemoveResponse {
                removed_id: args.contribution.clone(),
                total,
            })
        }
        GradeAction::Total(args) => {
            let key = args.key.to_key();
            let total = service.grade_total(&key).await?;
            let remaining = service.remaining_capacity(&key).await?;
            print_json(&GradeTotalResponse { total, remaining })
        }
        GradeAction::History(args) => {
            let mut entries = service.grade_history(&args.key.to_key()).await?;
            let limit = args.limit.unwrap_or(config.general.history_limit);
            entries.truncate(limit as usize);
            print_json(&GradeHistoryResponse { entries })
        }
    }
}
