//! `tally resolve` — pure evidence resolution, no database.

use tally_config::TallyConfig;
use tally_core::entities::EvidenceSnapshot;
use tally_core::resolver;
use tally_core::responses::ResolveResponse;

use crate::cli::ResolveArgs;
use crate::output::print_json;

pub fn handle(args: &ResolveArgs, config: &TallyConfig) -> anyhow::Result<()> {
    let session = args.session.to_session();
    let evidence = EvidenceSnapshot {
        last_login_at: args.last_login,
        minutes_watched: args.minutes_watched,
    };

    let resolution = resolver::resolve(&session, &evidence, &config.evidence);
    let note = resolution.note().map(String::from);
    print_json(&ResolveResponse { resolution, note })
}
