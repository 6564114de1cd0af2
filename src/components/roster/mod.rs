pub mod models;

pub use models::{
    Employee, EmployeeId, EmployeeTerms, EmployeeUpdate, EmploymentStatus, EmploymentType,
    PayType, Store, StoreId, WorkerRequest,
};
