pub mod collections;
pub mod connections;
pub mod groups;
pub mod memberships;

pub use collections::{CollectionDataSource, CollectionsDataSource};
pub use connections::{DataSourceDataSource, DataSourcesDataSource};
pub use groups::{GroupDataSource, GroupsDataSource};
pub use memberships::{GroupMembershipsDataSource, WorkspaceMembershipsDataSource};
