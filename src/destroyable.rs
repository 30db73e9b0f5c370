// for owners of subscriptions whose listeners hold an Rc back to them; breaks the link by hand
pub trait Destroyable {
    fn destroy(&mut self);
}
