pub mod collection;
pub mod collection_permission;
pub mod data_source_permission;
pub mod group;
pub mod group_membership;

pub use collection::CollectionResource;
pub use collection_permission::CollectionPermissionResource;
pub use data_source_permission::DataSourcePermissionResource;
pub use group::GroupResource;
pub use group_membership::GroupMembershipResource;
