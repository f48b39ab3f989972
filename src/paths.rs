use std::path::PathBuf;

/// Returns the user's home directory using common environment variables.
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("APPO_HOME").map(PathBuf::from).or_else(|| {
        std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(PathBuf::from)
    })
}

/// Returns the data directory where instance records and logs are kept.
pub fn data_dir() -> PathBuf {
    if let Some(mut dir) = home_dir() {
        dir.push(".appo");
        dir
    } else {
        PathBuf::from(".appo")
    }
}
