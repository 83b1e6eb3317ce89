use crate::actions::ActivityAction;
use crate::state::{ActivityEntry, ActivityLog};

pub fn reduce_activity(mut log: ActivityLog, action: &ActivityAction) -> ActivityLog {
    let ActivityAction::Record {
        kind,
        message,
        source,
    } = action;
    log.record(ActivityEntry::new(*kind, message.clone(), source.clone()));
    log
}
