mod uid_queues;

pub use uid_queues::UidQueues;
