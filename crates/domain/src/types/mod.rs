//! Domain types and models

pub mod cluster;
pub mod state;

pub use cluster::{
    AutoScale, AwsAttributes, ClusterIdRequest, ClusterInfo, CreateClusterRequest,
    CreateClusterResponse, EbsVolumeType, EditClusterRequest, ListClustersResponse,
};
pub use state::{ClusterOperation, ClusterState};
