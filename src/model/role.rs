#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    Employee = 1,
    Manager = 2,
    Hr = 3,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Employee),
            2 => Some(Role::Manager),
            3 => Some(Role::Hr),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_ids_map_and_back() {
        assert_eq!(Role::from_id(1), Some(Role::Employee));
        assert_eq!(Role::from_id(2), Some(Role::Manager));
        assert_eq!(Role::from_id(3), Some(Role::Hr));
        assert_eq!(Role::from_id(0), None);
        assert_eq!(Role::from_id(4), None);
        assert_eq!(Role::Manager as u8, 2);
    }
}
