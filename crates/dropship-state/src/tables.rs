//! redb table definitions.

use redb::TableDefinition;

/// Deployment records keyed by `{user_id}/{deployment_id}`.
pub const DEPLOYMENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("deployments");
