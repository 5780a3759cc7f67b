use super::Config;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(secs) = std::env::var("ASTERONIRIS_RECALL_TIME")
            && let Ok(secs) = secs.trim().parse::<u64>()
        {
            self.recall.recall_time = secs;
        }

        if let Ok(len) = std::env::var("ASTERONIRIS_RECALL_MAX_PLAIN_LEN")
            && let Ok(len) = len.trim().parse::<usize>()
        {
            self.recall.max_plain_len = len;
        }

        if let Ok(url) = std::env::var("ASTERONIRIS_ONEBOT_URL")
            && !url.is_empty()
        {
            self.onebot.base_url = url;
        }

        if let Ok(token) = std::env::var("ASTERONIRIS_ONEBOT_TOKEN")
            && !token.is_empty()
        {
            self.onebot.access_token = Some(token);
        }
    }
}
