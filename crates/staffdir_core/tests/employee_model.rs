use staffdir_core::Employee;

#[test]
fn new_employee_is_unsaved() {
    let employee = Employee::new("Jack", "Bauer");

    assert_eq!(employee.id, None);
    assert!(employee.is_new());
    assert_eq!(employee.first_name, "Jack");
    assert_eq!(employee.last_name, "Bauer");
}

#[test]
fn serialization_uses_camel_case_wire_fields() {
    let mut employee = Employee::new("Chloe", "O'Brian");
    employee.id = Some(12);

    let json = serde_json::to_value(&employee).unwrap();
    assert_eq!(json["id"], 12);
    assert_eq!(json["firstName"], "Chloe");
    assert_eq!(json["lastName"], "O'Brian");

    let decoded: Employee = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, employee);
}

#[test]
fn unsaved_employee_serializes_null_id() {
    let json = serde_json::to_value(Employee::new("Tony", "Almeida")).unwrap();
    assert!(json["id"].is_null());
}
