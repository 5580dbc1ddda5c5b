use campus_core::{directory::sample_credentials, LoginRequest, RegisterRequest, Role};

const MAX_FIELD_LEN: usize = 64;

/// Single-line text input.
#[derive(Debug, Clone)]
pub struct TextField {
    pub label: &'static str,
    pub input: String,
    pub cursor: usize,
    pub masked: bool,
}

impl TextField {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            input: String::new(),
            cursor: 0,
            masked: false,
        }
    }

    fn secret(label: &'static str) -> Self {
        Self {
            masked: true,
            ..Self::new(label)
        }
    }

    pub fn set(&mut self, value: &str) {
        self.input = value.to_string();
        self.cursor = self.input.len();
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.input.len() as isize;
        let next = (self.cursor as isize + delta).clamp(0, len);
        self.cursor = next as usize;
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input.len();
    }

    pub fn insert(&mut self, ch: char) {
        if self.input.len() >= MAX_FIELD_LEN {
            return;
        }
        if ch.is_ascii() && !ch.is_ascii_control() {
            self.input.insert(self.cursor, ch);
            self.cursor += 1;
        }
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 && self.cursor <= self.input.len() {
            self.cursor -= 1;
            self.input.remove(self.cursor);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.input.len() {
            self.input.remove(self.cursor);
        }
    }

    /// Text as rendered: bullets for secrets.
    pub fn display(&self) -> String {
        if self.masked {
            "•".repeat(self.input.len())
        } else {
            self.input.clone()
        }
    }
}

/// Where keyboard input goes inside a [`Form`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(usize),
    Role,
}

/// Text fields followed by a role selector.
#[derive(Debug, Clone)]
pub struct Form {
    pub fields: Vec<TextField>,
    pub role: Role,
    pub focus: Focus,
}

impl Form {
    pub fn login() -> Self {
        Self {
            fields: vec![TextField::new("Email"), TextField::secret("Password")],
            role: Role::Student,
            focus: Focus::Field(0),
        }
    }

    pub fn register() -> Self {
        Self {
            fields: vec![
                TextField::new("First name"),
                TextField::new("Last name"),
                TextField::new("Email"),
                TextField::secret("Password"),
                TextField::secret("Confirm password"),
                TextField::new("Student ID (parents)"),
            ],
            role: Role::Student,
            focus: Focus::Field(0),
        }
    }

    fn value(&self, idx: usize) -> String {
        self.fields
            .get(idx)
            .map(|field| field.input.clone())
            .unwrap_or_default()
    }

    pub fn field_mut(&mut self, label: &str) -> Option<&mut TextField> {
        self.fields.iter_mut().find(|field| field.label == label)
    }

    pub fn focused_field_mut(&mut self) -> Option<&mut TextField> {
        match self.focus {
            Focus::Field(idx) => self.fields.get_mut(idx),
            Focus::Role => None,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            Focus::Field(idx) if idx + 1 < self.fields.len() => Focus::Field(idx + 1),
            Focus::Field(_) => Focus::Role,
            Focus::Role => Focus::Field(0),
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            Focus::Field(0) => Focus::Role,
            Focus::Field(idx) => Focus::Field(idx - 1),
            Focus::Role => Focus::Field(self.fields.len().saturating_sub(1)),
        };
    }

    pub fn cycle_role(&mut self, delta: isize) {
        let len = Role::ALL.len() as isize;
        let current = Role::ALL
            .iter()
            .position(|role| *role == self.role)
            .unwrap_or(0) as isize;
        self.role = Role::ALL[(current + delta).rem_euclid(len) as usize];
    }

    /// Sample login advertised for the selected role.
    pub fn hint(&self) -> Option<(&'static str, &'static str)> {
        sample_credentials(self.role)
    }

    /// Copy the sample login for the selected role into the form.
    pub fn fill_sample(&mut self) -> bool {
        let Some((email, password)) = self.hint() else {
            return false;
        };
        if let Some(field) = self.field_mut("Email") {
            field.set(email);
        }
        if let Some(field) = self.field_mut("Password") {
            field.set(password);
        }
        true
    }

    pub fn clear_secrets(&mut self) {
        for field in self.fields.iter_mut().filter(|field| field.masked) {
            field.clear();
        }
    }

    pub fn login_request(&self) -> LoginRequest {
        LoginRequest::new(self.value(0).trim(), self.value(1), self.role.as_str())
    }

    pub fn register_request(&self) -> RegisterRequest {
        RegisterRequest {
            first_name: self.value(0),
            last_name: self.value(1),
            email: self.value(2).trim().to_string(),
            password: self.value(3),
            confirm_password: self.value(4),
            role: self.role.as_str().to_string(),
            child_id: Some(self.value(5).trim().to_string()).filter(|id| !id.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_field_editing() {
        let mut field = TextField::new("Email");
        for ch in "alex".chars() {
            field.insert(ch);
        }
        field.move_cursor(-2);
        field.backspace();
        assert_eq!(field.input, "aex");
        field.move_home();
        field.delete();
        assert_eq!(field.input, "ex");
        field.move_cursor(10);
        assert_eq!(field.cursor, 2);
        field.insert('\n');
        assert_eq!(field.input, "ex");
    }

    #[test]
    fn secrets_are_masked() {
        let mut field = TextField::secret("Password");
        field.set("abc");
        assert_eq!(field.display(), "•••");
        assert_eq!(field.input, "abc");
    }

    #[test]
    fn focus_cycles_through_role_selector() {
        let mut form = Form::login();
        form.focus_next();
        assert_eq!(form.focus, Focus::Field(1));
        form.focus_next();
        assert_eq!(form.focus, Focus::Role);
        form.focus_next();
        assert_eq!(form.focus, Focus::Field(0));
        form.focus_prev();
        assert_eq!(form.focus, Focus::Role);
    }

    #[test]
    fn role_selector_wraps() {
        let mut form = Form::login();
        form.cycle_role(-1);
        assert_eq!(form.role, Role::ALL[Role::ALL.len() - 1]);
        form.cycle_role(1);
        assert_eq!(form.role, Role::ALL[0]);
    }

    #[test]
    fn sample_fill_builds_login_request() {
        let mut form = Form::login();
        form.role = Role::Parent;
        assert!(form.fill_sample());
        let request = form.login_request();
        assert_eq!(request.email, "robert.johnson@example.com");
        assert_eq!(request.password, "password123");
        assert_eq!(request.role, "parent");

        form.clear_secrets();
        assert!(form.login_request().password.is_empty());
    }

    #[test]
    fn register_request_maps_fields() {
        let mut form = Form::register();
        let values = ["Emma", "Davis", " emma@example.com ", "pw", "pw"];
        for (field, value) in form.fields.iter_mut().zip(values) {
            field.set(value);
        }
        form.role = Role::Faculty;
        let request = form.register_request();
        assert_eq!(request.first_name, "Emma");
        assert_eq!(request.email, "emma@example.com");
        assert_eq!(request.confirm_password, "pw");
        assert_eq!(request.role, "faculty");
        assert_eq!(request.child_id, None);

        form.role = Role::Parent;
        if let Some(field) = form.field_mut("Student ID (parents)") {
            field.set(" ST12345 ");
        }
        assert_eq!(form.register_request().child_id.as_deref(), Some("ST12345"));
    }
}
