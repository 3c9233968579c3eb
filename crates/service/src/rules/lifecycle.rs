//! Job and offer state machines.

use models::job::JobStatus;
use models::offer::OfferStatus;

use crate::errors::ServiceError;

pub fn job_can_transition(from: JobStatus, to: JobStatus) -> bool {
    use JobStatus::*;
    matches!(
        (from, to),
        (Open, Assigned) | (Assigned, Completed) | (Open, Cancelled) | (Assigned, Cancelled)
    )
}

pub fn offer_can_transition(from: OfferStatus, to: OfferStatus) -> bool {
    use OfferStatus::*;
    matches!((from, to), (Pending, Accepted) | (Pending, Rejected) | (Pending, Withdrawn))
}

pub fn check_job_transition(from: JobStatus, to: JobStatus) -> Result<(), ServiceError> {
    if !job_can_transition(from, to) {
        return Err(ServiceError::transition("job", from, to));
    }
    Ok(())
}

pub fn check_offer_transition(from: OfferStatus, to: OfferStatus) -> Result<(), ServiceError> {
    if !offer_can_transition(from, to) {
        return Err(ServiceError::transition("offer", from, to));
    }
    Ok(())
}
