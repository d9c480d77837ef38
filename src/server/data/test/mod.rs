mod cache;
mod instance_lock;
