/// Result of inspecting the current infrastructure.
///
/// Computed once by the inspector and handed to the planner; `false` always
/// means "unmet", whether the resource is missing or the query failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preconditions {
    pub content_bucket_exists: bool,
    pub log_bucket_exists: bool,
    pub acl_has_read_acp_grant: bool,
    pub acl_has_write_grant: bool,
    pub logging_target_prefix_correct: bool,
    pub logging_target_bucket_correct: bool,
    pub website_document_present: bool,
    pub distribution_document_present: bool,
    pub distribution_exists: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    Missing,
    Created,
    Configured,
}

impl Preconditions {
    pub fn log_delivery_granted(&self) -> bool {
        self.acl_has_read_acp_grant && self.acl_has_write_grant
    }

    pub fn logging_correct(&self) -> bool {
        self.logging_target_bucket_correct && self.logging_target_prefix_correct
    }

    pub fn content_bucket_state(&self) -> ResourceState {
        match (self.content_bucket_exists, self.logging_correct()) {
            (false, _) => ResourceState::Missing,
            (true, false) => ResourceState::Created,
            (true, true) => ResourceState::Configured,
        }
    }

    pub fn log_bucket_state(&self) -> ResourceState {
        match (self.log_bucket_exists, self.log_delivery_granted()) {
            (false, _) => ResourceState::Missing,
            (true, false) => ResourceState::Created,
            (true, true) => ResourceState::Configured,
        }
    }
}
