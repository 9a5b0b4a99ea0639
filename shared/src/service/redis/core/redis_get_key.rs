// redis 키타입 정의

//access_token => auth:access_token:{user_id}
//refresh_token => auth:refresh_token:{user_id}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    AccessToken,
    RefreshToken,
}

impl KeyType {
    pub fn get_key(&self, id: i64) -> String {
        match self {
            KeyType::AccessToken => format!("auth:access_token:{}", id),
            KeyType::RefreshToken => format!("auth:refresh_token:{}", id),
        }
    }
}
