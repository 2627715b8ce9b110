//! Database service layer
//!
//! This module bundles the repositories behind one constructor so the rest
//! of the application only ever sees a single database handle.

use crate::database::{DatabasePool, GroupConfigRepository, MembershipRepository};

#[derive(Clone)]
pub struct DatabaseService {
    pub group_configs: GroupConfigRepository,
    pub memberships: MembershipRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            group_configs: GroupConfigRepository::new(pool.clone()),
            memberships: MembershipRepository::new(pool),
        }
    }
}
