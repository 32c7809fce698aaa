//! Static HTML for the pages that only collect input or confirm an outcome.
//!
//! Listing and detail pages are served as JSON; styling is not ours.

pub const LOGIN_FORM: &str = r#"<!DOCTYPE html>
<html>
<head><title>Login</title></head>
<body>
    <h1>Login</h1>
    <form method="post" action="/login">
        <label>Email <input type="email" name="email" required></label>
        <label>Password <input type="password" name="password" required></label>
        <button type="submit">Login</button>
    </form>
</body>
</html>
"#;

pub const ADD_FORM: &str = r#"<!DOCTYPE html>
<html>
<head><title>Add Item</title></head>
<body>
    <h1>Add Item</h1>
    <form method="post" action="/add">
        <label>Name <input type="text" name="name" maxlength="250" required></label>
        <label>Image URL <input type="url" name="urlimage" maxlength="250" required></label>
        <label>Price <input type="number" name="price" step="0.01" min="0" required></label>
        <button type="submit">Add</button>
    </form>
</body>
</html>
"#;

pub const CHECKOUT_SUCCESS: &str = r#"<!DOCTYPE html>
<html>
<head><title>Payment Successful</title></head>
<body>
    <h1>Payment Successful!</h1>
    <p>Thank you for your order.</p>
    <a href="/store">Back to the store</a>
</body>
</html>
"#;

pub const CHECKOUT_CANCEL: &str = r#"<!DOCTYPE html>
<html>
<head><title>Payment Cancelled</title></head>
<body>
    <h1>Payment Cancelled</h1>
    <p>No charges were made.</p>
    <a href="/store">Back to the store</a>
</body>
</html>
"#;
